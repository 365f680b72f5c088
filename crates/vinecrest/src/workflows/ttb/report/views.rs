use super::super::tax_class::TaxClass;
use super::super::transactions::Section;
use crate::workflows::production::domain::OwnerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Gallons per tax class. Every class key is always present.
pub type ClassValues = BTreeMap<TaxClass, f64>;

pub(crate) fn zero_values() -> ClassValues {
    TaxClass::ordered()
        .into_iter()
        .map(|class| (class, 0.0))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl ReportId {
    /// Stable id per owner and period, so regenerating a period replaces its draft.
    pub fn for_period(owner: &OwnerId, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self(format!(
            "ttb-{}-{}-{}",
            owner,
            period_start.format("%Y%m%d"),
            period_end.format("%Y%m%d")
        ))
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub line: String,
    pub label: String,
    pub values: ClassValues,
    /// Sum of `values` across every class.
    pub total: f64,
    #[serde(default)]
    pub is_total: bool,
    #[serde(default)]
    pub is_end_balance: bool,
}

impl ReportRow {
    pub fn value(&self, class: TaxClass) -> f64 {
        self.values.get(&class).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRows {
    pub additions: Vec<ReportRow>,
    pub removals: Vec<ReportRow>,
}

impl SectionRows {
    pub fn end_balance(&self) -> Option<&ReportRow> {
        self.removals.iter().find(|row| row.is_end_balance)
    }

    pub fn additions_total(&self) -> Option<&ReportRow> {
        self.additions.iter().find(|row| row.is_total)
    }

    pub fn removals_total(&self) -> Option<&ReportRow> {
        self.removals.iter().find(|row| row.is_total)
    }

    pub fn row(&self, line: &str) -> Option<&ReportRow> {
        self.additions
            .iter()
            .chain(self.removals.iter())
            .find(|row| row.line == line)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxClassSummary {
    pub bulk_produced: f64,
    pub bulk_on_hand: f64,
    pub bottled_produced: f64,
    pub bottled_on_hand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_bulk_produced: f64,
    pub total_bulk_on_hand: f64,
    pub total_bottled_produced: f64,
    pub total_bottled_on_hand: f64,
    pub by_tax_class: BTreeMap<TaxClass, TaxClassSummary>,
}

/// Form 5120.17 grid for one owner and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtbReport {
    pub id: ReportId,
    pub owner: OwnerId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub rules_version: u32,
    pub bulk: SectionRows,
    pub bottled: SectionRows,
    pub summary: ReportSummary,
}

impl TtbReport {
    pub fn section(&self, section: Section) -> &SectionRows {
        match section {
            Section::Bulk => &self.bulk,
            Section::Bottled => &self.bottled,
        }
    }
}
