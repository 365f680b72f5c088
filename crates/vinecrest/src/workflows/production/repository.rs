use serde::{Deserialize, Serialize};

use super::domain::{Lot, LotId, LotStatus, OwnerId};
use crate::workflows::ttb::TaxClass;

/// Cached classification written back onto a lot by the batch refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClassUpdate {
    pub lot_id: LotId,
    pub tax_class: TaxClass,
    pub rules_version: u32,
}

/// Storage abstraction over the lot table; every call is scoped to an owner.
///
/// Implementations must populate `Lot::barrel_assignments` on reads.
pub trait LotRepository: Send + Sync {
    fn upsert(&self, lot: Lot) -> Result<Lot, RepositoryError>;
    fn fetch(&self, owner: &OwnerId, id: &LotId) -> Result<Option<Lot>, RepositoryError>;
    fn list(&self, owner: &OwnerId) -> Result<Vec<Lot>, RepositoryError>;
    fn update_status(
        &self,
        owner: &OwnerId,
        id: &LotId,
        status: LotStatus,
    ) -> Result<Lot, RepositoryError>;
    /// Apply every update in one write; returns the number of rows changed.
    fn update_tax_classes(
        &self,
        owner: &OwnerId,
        updates: &[TaxClassUpdate],
    ) -> Result<usize, RepositoryError>;
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
