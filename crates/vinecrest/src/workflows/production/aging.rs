use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Lot;

/// Which lot field supplied the aging start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingSource {
    AgingStartDate,
    BarrelAssignment,
    FermentationEndDate,
    Unknown,
}

impl AgingSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AgingStartDate => "Aging start date",
            Self::BarrelAssignment => "First barrel assignment",
            Self::FermentationEndDate => "Fermentation end date",
            Self::Unknown => "Unknown",
        }
    }
}

/// Resolved aging start with provenance.
///
/// A zero aging duration paired with `is_unknown == true` means "no date on
/// record", not "aging started this month".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingStart {
    pub date: Option<DateTime<Utc>>,
    pub source: AgingSource,
    pub is_unknown: bool,
}

/// First present candidate wins: explicit start, earliest barrel assignment,
/// fermentation end.
pub fn aging_start_date(lot: &Lot) -> AgingStart {
    if let Some(date) = lot.aging_start_date {
        return AgingStart {
            date: Some(date),
            source: AgingSource::AgingStartDate,
            is_unknown: false,
        };
    }

    let earliest_barrel = lot
        .barrel_assignments
        .as_deref()
        .and_then(|assignments| assignments.iter().map(|a| a.assigned_at).min());
    if let Some(date) = earliest_barrel {
        return AgingStart {
            date: Some(date),
            source: AgingSource::BarrelAssignment,
            is_unknown: false,
        };
    }

    if let Some(date) = lot.fermentation_end_date {
        return AgingStart {
            date: Some(date),
            source: AgingSource::FermentationEndDate,
            is_unknown: false,
        };
    }

    AgingStart {
        date: None,
        source: AgingSource::Unknown,
        is_unknown: true,
    }
}

/// Calendar months between the resolved start and `now`, floored at zero.
pub fn compute_aging_months(lot: &Lot, now: DateTime<Utc>) -> u32 {
    match aging_start_date(lot).date {
        Some(start) => calendar_months_between(start, now),
        None => 0,
    }
}

fn calendar_months_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let months = (i64::from(now.year()) * 12 + i64::from(now.month()))
        - (i64::from(start.year()) * 12 + i64::from(start.month()));
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
pub(crate) fn calendar_months_for_tests(start: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    calendar_months_between(start, now)
}
