use super::super::domain::{Lot, LotStatus};
use super::config::ReadinessConfig;
use serde::{Deserialize, Serialize};

/// Rule families in the order they are evaluated and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessFactor {
    Volume,
    Alcohol,
    Status,
    LabData,
    Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorMark {
    Pass,
    Fail,
    Neutral,
}

impl FactorMark {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Neutral => "○",
        }
    }
}

/// Single rule contribution, kept for transparent breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ReadinessFactor,
    pub mark: FactorMark,
    pub points: i32,
    pub notes: String,
}

impl ScoreComponent {
    pub fn breakdown_line(&self) -> String {
        format!("{} {}", self.mark.glyph(), self.notes)
    }
}

pub(crate) fn score_components(lot: &Lot, config: &ReadinessConfig) -> Vec<ScoreComponent> {
    let policy = &config.scoring;
    let min_volume = config.bottling.min_volume_gallons;
    let mut components = Vec::with_capacity(5);

    let volume = lot.current_volume_gallons;
    if !config.bottling.volume_sufficient(volume) {
        components.push(ScoreComponent {
            factor: ReadinessFactor::Volume,
            mark: FactorMark::Fail,
            points: policy.volume_below_minimum,
            notes: format!(
                "Volume {:.1} gal is below the {:.0} gal bottling minimum",
                volume, min_volume
            ),
        });
    } else {
        components.push(ScoreComponent {
            factor: ReadinessFactor::Volume,
            mark: FactorMark::Pass,
            points: policy.volume_sufficient,
            notes: format!("Volume {:.1} gal meets the {:.0} gal minimum", volume, min_volume),
        });
    }

    match lot.measured_alcohol_pct() {
        Some(abv) => components.push(ScoreComponent {
            factor: ReadinessFactor::Alcohol,
            mark: FactorMark::Pass,
            points: policy.alcohol_measured,
            notes: format!("ABV measured at {:.1}%", abv),
        }),
        None => components.push(ScoreComponent {
            factor: ReadinessFactor::Alcohol,
            mark: FactorMark::Fail,
            points: policy.alcohol_unmeasured,
            notes: "ABV not measured".to_string(),
        }),
    }

    let (mark, points) = match lot.status {
        LotStatus::ReadyToBottle => (FactorMark::Pass, policy.status_ready_to_bottle),
        LotStatus::Aging => (FactorMark::Neutral, policy.status_aging),
        LotStatus::Blending => (FactorMark::Neutral, policy.status_blending),
        _ => (FactorMark::Fail, 0),
    };
    components.push(ScoreComponent {
        factor: ReadinessFactor::Status,
        mark,
        points,
        notes: format!("Status {} ({:+})", lot.status.label(), points),
    });

    if lot.has_lab_data() {
        components.push(ScoreComponent {
            factor: ReadinessFactor::LabData,
            mark: FactorMark::Pass,
            points: policy.lab_data_present,
            notes: "Lab chemistry on record".to_string(),
        });
    } else {
        components.push(ScoreComponent {
            factor: ReadinessFactor::LabData,
            mark: FactorMark::Fail,
            points: policy.lab_data_missing,
            notes: "No lab chemistry recorded (pH, TA, ABV)".to_string(),
        });
    }

    match lot.named_container() {
        Some(container) => components.push(ScoreComponent {
            factor: ReadinessFactor::Container,
            mark: FactorMark::Pass,
            points: policy.container_named,
            notes: format!("Stored in {container}"),
        }),
        None => components.push(ScoreComponent {
            factor: ReadinessFactor::Container,
            mark: FactorMark::Neutral,
            points: 0,
            notes: "No container assigned".to_string(),
        }),
    }

    components
}

pub(crate) fn total_score(components: &[ScoreComponent], config: &ReadinessConfig) -> u8 {
    let raw = components
        .iter()
        .fold(config.scoring.baseline, |acc, component| {
            acc.saturating_add(component.points)
        });
    raw.clamp(0, 100) as u8
}
