//! Lot production tracking: aging provenance, readiness scoring, and the
//! bottling gates.

pub mod aging;
pub mod domain;
pub mod readiness;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aging::{aging_start_date, compute_aging_months, AgingSource, AgingStart};
pub use domain::{BarrelAssignment, Lot, LotId, LotStatus, OwnerId};
pub use readiness::{
    compute_readiness, is_lot_eligible, is_lot_nearly_ready, lot_blockers, readiness_explanation,
    BlockerAction, BlockerKind, BottlingPolicy, LotBlocker, ReadinessConfig, ReadinessEngine,
    ReadinessExplanation, ScoringPolicy,
};
pub use repository::{LotRepository, RepositoryError, TaxClassUpdate};
pub use router::lot_router;
pub use service::{BottlingQueueEntry, LotAssessment, LotService, LotServiceError, TaxClassRefresh};
