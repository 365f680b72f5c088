mod config;
pub(crate) mod eligibility;
mod rules;

pub use config::{BottlingPolicy, ReadinessConfig, ScoringPolicy};
pub use eligibility::{BlockerAction, BlockerKind, LotBlocker};
pub use rules::{FactorMark, ReadinessFactor, ScoreComponent};

use super::domain::Lot;
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying a [`ReadinessConfig`] to lots.
///
/// The score is advisory (sorting, display); [`ReadinessEngine::is_eligible`]
/// is the only authorization check for bottling.
#[derive(Debug, Clone, Default)]
pub struct ReadinessEngine {
    config: ReadinessConfig,
}

impl ReadinessEngine {
    pub fn new(config: ReadinessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    pub fn score(&self, lot: &Lot) -> u8 {
        let components = rules::score_components(lot, &self.config);
        rules::total_score(&components, &self.config)
    }

    pub fn components(&self, lot: &Lot) -> Vec<ScoreComponent> {
        rules::score_components(lot, &self.config)
    }

    pub fn is_eligible(&self, lot: &Lot) -> bool {
        eligibility::is_eligible(lot, &self.config.bottling)
    }

    pub fn is_nearly_ready(&self, lot: &Lot) -> bool {
        eligibility::is_nearly_ready(lot, &self.config.bottling)
    }

    pub fn blockers(&self, lot: &Lot) -> Vec<LotBlocker> {
        eligibility::blockers(lot, &self.config.bottling)
    }

    pub fn explain(&self, lot: &Lot) -> ReadinessExplanation {
        let components = rules::score_components(lot, &self.config);
        let score = rules::total_score(&components, &self.config);
        let breakdown = components
            .iter()
            .map(ScoreComponent::breakdown_line)
            .collect();

        ReadinessExplanation {
            score,
            breakdown,
            blockers: self.blockers(lot),
            eligible: self.is_eligible(lot),
            nearly_ready: self.is_nearly_ready(lot),
            policy_version: self.config.scoring.version,
        }
    }
}

/// Score plus the per-rule trail shown next to a lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessExplanation {
    pub score: u8,
    pub breakdown: Vec<String>,
    pub blockers: Vec<LotBlocker>,
    pub eligible: bool,
    pub nearly_ready: bool,
    pub policy_version: u32,
}

pub fn compute_readiness(lot: &Lot) -> u8 {
    ReadinessEngine::default().score(lot)
}

pub fn readiness_explanation(lot: &Lot) -> ReadinessExplanation {
    ReadinessEngine::default().explain(lot)
}

pub fn is_lot_eligible(lot: &Lot) -> bool {
    eligibility::is_eligible(lot, &BottlingPolicy::default())
}

pub fn is_lot_nearly_ready(lot: &Lot) -> bool {
    eligibility::is_nearly_ready(lot, &BottlingPolicy::default())
}

pub fn lot_blockers(lot: &Lot) -> Vec<LotBlocker> {
    eligibility::blockers(lot, &BottlingPolicy::default())
}
