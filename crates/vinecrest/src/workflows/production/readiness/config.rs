use serde::{Deserialize, Serialize};

/// Hard gates applied before a lot may be bottled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BottlingPolicy {
    pub min_volume_gallons: f64,
}

impl BottlingPolicy {
    pub const STANDARD_MIN_VOLUME_GALLONS: f64 = 10.0;

    pub fn volume_sufficient(&self, gallons: f64) -> bool {
        gallons.is_finite() && gallons >= self.min_volume_gallons
    }
}

impl Default for BottlingPolicy {
    fn default() -> Self {
        Self {
            min_volume_gallons: Self::STANDARD_MIN_VOLUME_GALLONS,
        }
    }
}

/// Point weights for the advisory readiness score.
///
/// UI score bands are calibrated against a specific `version`; any change to
/// the weights must bump it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub version: u32,
    pub baseline: i32,
    pub volume_below_minimum: i32,
    pub volume_sufficient: i32,
    pub alcohol_unmeasured: i32,
    pub alcohol_measured: i32,
    pub status_ready_to_bottle: i32,
    pub status_aging: i32,
    pub status_blending: i32,
    pub lab_data_present: i32,
    pub lab_data_missing: i32,
    pub container_named: i32,
}

impl ScoringPolicy {
    pub const fn v1() -> Self {
        Self {
            version: 1,
            baseline: 50,
            volume_below_minimum: -30,
            volume_sufficient: 10,
            alcohol_unmeasured: -20,
            alcohol_measured: 10,
            status_ready_to_bottle: 20,
            status_aging: 10,
            status_blending: 5,
            lab_data_present: 10,
            lab_data_missing: -10,
            container_named: 5,
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::v1()
    }
}

/// Thresholds and weights handed to the readiness engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub bottling: BottlingPolicy,
    pub scoring: ScoringPolicy,
}
