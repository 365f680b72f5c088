use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::ttb::{TaxClass, WineType};

/// Identifier wrapper for production lots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LotId(pub String);

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account (tenant) that owns lots, transactions, and reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    Crushing,
    Pressing,
    Fermenting,
    Aging,
    Blending,
    Filtering,
    ReadyToBottle,
    Bottled,
}

impl LotStatus {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Crushing,
            Self::Pressing,
            Self::Fermenting,
            Self::Aging,
            Self::Blending,
            Self::Filtering,
            Self::ReadyToBottle,
            Self::Bottled,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Crushing => "Crushing",
            Self::Pressing => "Pressing",
            Self::Fermenting => "Fermenting",
            Self::Aging => "Aging",
            Self::Blending => "Blending",
            Self::Filtering => "Filtering",
            Self::ReadyToBottle => "Ready to Bottle",
            Self::Bottled => "Bottled",
        }
    }

    /// Statuses from which a lot may be promoted to ready-to-bottle.
    pub const fn is_finishing(self) -> bool {
        matches!(self, Self::Aging | Self::Blending)
    }
}

/// Barrel placement for a lot. Only the placement time matters for aging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrelAssignment {
    pub assigned_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barrel_code: Option<String>,
}

/// A tracked batch of wine from crush through bottling.
///
/// Alcohol, pH and TA readings of `None` or zero both mean "not measured";
/// a zero ABV reading is never interpreted as a 0% wine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    /// Set from the authenticated account on write; may be omitted in payloads.
    #[serde(default)]
    pub owner: OwnerId,
    pub name: String,
    pub status: LotStatus,
    #[serde(default = "default_wine_type")]
    pub wine_type: WineType,
    pub current_volume_gallons: f64,
    #[serde(default)]
    pub current_alcohol_pct: Option<f64>,
    #[serde(default)]
    pub current_ph: Option<f64>,
    #[serde(default)]
    pub current_ta: Option<f64>,
    #[serde(default)]
    pub aging_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fermentation_end_date: Option<DateTime<Utc>>,
    /// `None` when the relation was not loaded, `Some(vec![])` when loaded and empty.
    #[serde(default)]
    pub barrel_assignments: Option<Vec<BarrelAssignment>>,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub tax_class: Option<TaxClass>,
    #[serde(default)]
    pub tax_class_rules_version: Option<u32>,
}

fn default_wine_type() -> WineType {
    WineType::Still
}

impl Lot {
    pub fn new(
        id: impl Into<String>,
        owner: OwnerId,
        name: impl Into<String>,
        status: LotStatus,
        current_volume_gallons: f64,
    ) -> Self {
        Self {
            id: LotId(id.into()),
            owner,
            name: name.into(),
            status,
            wine_type: WineType::Still,
            current_volume_gallons,
            current_alcohol_pct: None,
            current_ph: None,
            current_ta: None,
            aging_start_date: None,
            fermentation_end_date: None,
            barrel_assignments: None,
            container_name: None,
            tax_class: None,
            tax_class_rules_version: None,
        }
    }

    /// Alcohol reading when one has actually been taken.
    pub fn measured_alcohol_pct(&self) -> Option<f64> {
        measured(self.current_alcohol_pct)
    }

    pub fn has_lab_data(&self) -> bool {
        measured(self.current_ph).is_some()
            || measured(self.current_ta).is_some()
            || self.measured_alcohol_pct().is_some()
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn named_container(&self) -> Option<&str> {
        self.container_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn measured(reading: Option<f64>) -> Option<f64> {
    reading.filter(|value| value.is_finite() && *value > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_readings_count_as_unmeasured() {
        let mut lot = Lot::new(
            "lot-1",
            OwnerId("owner".into()),
            "Block A",
            LotStatus::Aging,
            40.0,
        );
        lot.current_alcohol_pct = Some(0.0);
        lot.current_ph = Some(0.0);
        assert_eq!(lot.measured_alcohol_pct(), None);
        assert!(!lot.has_lab_data());

        lot.current_ta = Some(6.2);
        assert!(lot.has_lab_data());
    }

    #[test]
    fn blank_container_is_not_named() {
        let mut lot = Lot::new(
            "lot-1",
            OwnerId("owner".into()),
            "Block A",
            LotStatus::Aging,
            40.0,
        );
        lot.container_name = Some("   ".into());
        assert_eq!(lot.named_container(), None);
        lot.container_name = Some("Tank 4".into());
        assert_eq!(lot.named_container(), Some("Tank 4"));
    }

    #[test]
    fn deserializes_sparse_records() {
        let lot: Lot = serde_json::from_value(serde_json::json!({
            "id": "lot-7",
            "owner": "owner-1",
            "name": "Reserve Syrah",
            "status": "ready_to_bottle",
            "current_volume_gallons": 120.0,
            "current_alcohol_pct": 14.2
        }))
        .expect("sparse lot deserializes");
        assert_eq!(lot.status, LotStatus::ReadyToBottle);
        assert_eq!(lot.wine_type, WineType::Still);
        assert!(lot.barrel_assignments.is_none());
    }
}
