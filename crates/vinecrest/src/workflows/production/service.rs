use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::aging::{aging_start_date, compute_aging_months, AgingStart};
use super::domain::{Lot, LotId, LotStatus, OwnerId};
use super::readiness::{LotBlocker, ReadinessConfig, ReadinessEngine, ReadinessExplanation};
use super::repository::{LotRepository, RepositoryError, TaxClassUpdate};
use crate::workflows::ttb::{determine_tax_class, TAX_CLASS_RULES_VERSION};

/// Readiness view of a single lot, including aging provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotAssessment {
    pub lot_id: LotId,
    pub name: String,
    pub status: LotStatus,
    pub readiness: ReadinessExplanation,
    pub aging_months: u32,
    pub aging_start: AgingStart,
}

/// Row of the bottling queue, ordered by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottlingQueueEntry {
    pub lot_id: LotId,
    pub name: String,
    pub status: LotStatus,
    pub score: u8,
    pub eligible: bool,
    pub nearly_ready: bool,
}

/// Outcome of a batch tax-class refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClassRefresh {
    pub examined: usize,
    pub updated: usize,
    pub rules_version: u32,
}

/// Service composing the lot repository with the readiness engine.
pub struct LotService<L> {
    repository: Arc<L>,
    engine: Arc<ReadinessEngine>,
}

impl<L> LotService<L>
where
    L: LotRepository + 'static,
{
    pub fn new(repository: Arc<L>, config: ReadinessConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(ReadinessEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &ReadinessEngine {
        &self.engine
    }

    pub fn register(&self, lot: Lot) -> Result<Lot, LotServiceError> {
        let stored = self.repository.upsert(lot)?;
        debug!(lot_id = %stored.id, owner = %stored.owner, "lot registered");
        Ok(stored)
    }

    pub fn get(&self, owner: &OwnerId, lot_id: &LotId) -> Result<Lot, LotServiceError> {
        self.repository
            .fetch(owner, lot_id)?
            .ok_or_else(|| LotServiceError::NotFound(lot_id.clone()))
    }

    /// Score, blockers, and aging for one lot as of `now`.
    pub fn assess(
        &self,
        owner: &OwnerId,
        lot_id: &LotId,
        now: DateTime<Utc>,
    ) -> Result<LotAssessment, LotServiceError> {
        let lot = self.get(owner, lot_id)?;
        let readiness = self.engine.explain(&lot);
        debug!(lot_id = %lot.id, score = readiness.score, eligible = readiness.eligible, "lot assessed");

        Ok(LotAssessment {
            lot_id: lot.id.clone(),
            name: lot.name.clone(),
            status: lot.status,
            aging_months: compute_aging_months(&lot, now),
            aging_start: aging_start_date(&lot),
            readiness,
        })
    }

    /// Unbottled lots sorted by readiness score, highest first.
    pub fn bottling_queue(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<BottlingQueueEntry>, LotServiceError> {
        let mut entries: Vec<BottlingQueueEntry> = self
            .repository
            .list(owner)?
            .into_iter()
            .filter(|lot| lot.status != LotStatus::Bottled)
            .map(|lot| BottlingQueueEntry {
                score: self.engine.score(&lot),
                eligible: self.engine.is_eligible(&lot),
                nearly_ready: self.engine.is_nearly_ready(&lot),
                lot_id: lot.id,
                name: lot.name,
                status: lot.status,
            })
            .collect();

        entries.sort_by(|a, b| {
            Reverse(a.score)
                .cmp(&Reverse(b.score))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(entries)
    }

    /// Promote an aging or blending lot that clears the material gates.
    pub fn mark_ready_to_bottle(
        &self,
        owner: &OwnerId,
        lot_id: &LotId,
    ) -> Result<Lot, LotServiceError> {
        let lot = self.get(owner, lot_id)?;
        if lot.status == LotStatus::ReadyToBottle {
            return Ok(lot);
        }

        if !self.engine.is_nearly_ready(&lot) {
            let blockers = self.engine.blockers(&lot);
            warn!(lot_id = %lot.id, blockers = blockers.len(), "lot refused for ready-to-bottle");
            return Err(LotServiceError::NotNearlyReady {
                lot_id: lot.id,
                blockers,
            });
        }

        let updated = self
            .repository
            .update_status(owner, lot_id, LotStatus::ReadyToBottle)?;
        info!(lot_id = %updated.id, "lot marked ready to bottle");
        Ok(updated)
    }

    /// Irreversible transition; only eligible lots pass.
    pub fn mark_bottled(&self, owner: &OwnerId, lot_id: &LotId) -> Result<Lot, LotServiceError> {
        let lot = self.get(owner, lot_id)?;
        if !self.engine.is_eligible(&lot) {
            let blockers = self.engine.blockers(&lot);
            warn!(lot_id = %lot.id, blockers = blockers.len(), "lot refused for bottling");
            return Err(LotServiceError::NotEligible {
                lot_id: lot.id,
                blockers,
            });
        }

        let updated = self
            .repository
            .update_status(owner, lot_id, LotStatus::Bottled)?;
        info!(lot_id = %updated.id, "lot bottled");
        Ok(updated)
    }

    /// Recompute cached tax classes; lots already current are not rewritten.
    pub fn batch_update_lot_tax_classes(
        &self,
        owner: &OwnerId,
    ) -> Result<TaxClassRefresh, LotServiceError> {
        let lots = self.repository.list(owner)?;
        let examined = lots.len();

        let updates: Vec<TaxClassUpdate> = lots
            .iter()
            .filter_map(|lot| {
                let computed = determine_tax_class(lot.wine_type, lot.current_alcohol_pct);
                let current = lot.tax_class == Some(computed)
                    && lot.tax_class_rules_version == Some(TAX_CLASS_RULES_VERSION);
                (!current).then(|| TaxClassUpdate {
                    lot_id: lot.id.clone(),
                    tax_class: computed,
                    rules_version: TAX_CLASS_RULES_VERSION,
                })
            })
            .collect();

        let updated = if updates.is_empty() {
            0
        } else {
            self.repository.update_tax_classes(owner, &updates)?
        };

        info!(%owner, examined, updated, rules_version = TAX_CLASS_RULES_VERSION, "lot tax classes refreshed");
        Ok(TaxClassRefresh {
            examined,
            updated,
            rules_version: TAX_CLASS_RULES_VERSION,
        })
    }
}

/// Error raised by the lot service.
#[derive(Debug, thiserror::Error)]
pub enum LotServiceError {
    #[error("lot {0} not found")]
    NotFound(LotId),
    #[error("lot {lot_id} is not eligible for bottling ({} blocker(s))", .blockers.len())]
    NotEligible {
        lot_id: LotId,
        blockers: Vec<LotBlocker>,
    },
    #[error("lot {lot_id} cannot be marked ready to bottle ({} blocker(s))", .blockers.len())]
    NotNearlyReady {
        lot_id: LotId,
        blockers: Vec<LotBlocker>,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
