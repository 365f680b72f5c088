use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::report::{ReportId, TtbReport};
use super::transactions::Transaction;
use crate::workflows::production::domain::OwnerId;
use crate::workflows::production::repository::RepositoryError;

/// Storage abstraction over the production ledger.
pub trait TransactionRepository: Send + Sync {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;
    /// Store the whole batch or none of it. A repeated id, within the batch
    /// or against stored rows of the same owner, is a `Conflict`.
    fn insert_many(&self, transactions: Vec<Transaction>) -> Result<usize, RepositoryError>;
    /// Every transaction for the owner dated on or before `end`.
    fn list_through(
        &self,
        owner: &OwnerId,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, RepositoryError>;
}

/// Storage abstraction for generated reports.
pub trait ReportRepository: Send + Sync {
    /// Insert or replace the record with the same report id.
    fn save(&self, record: StoredReport) -> Result<StoredReport, RepositoryError>;
    fn fetch(&self, owner: &OwnerId, id: &ReportId)
        -> Result<Option<StoredReport>, RepositoryError>;
    fn list(&self, owner: &OwnerId) -> Result<Vec<StoredReport>, RepositoryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Finalized,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Finalized => "Finalized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub report: TtbReport,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
}

impl StoredReport {
    pub fn draft(report: TtbReport) -> Self {
        Self {
            report,
            status: ReportStatus::Draft,
            finalized_at: None,
        }
    }

    pub fn status_view(&self) -> ReportStatusView {
        ReportStatusView {
            report_id: self.report.id.clone(),
            period_start: self.report.period_start,
            period_end: self.report.period_end,
            status: self.status.label(),
            total_bulk_on_hand: self.report.summary.total_bulk_on_hand,
            total_bottled_on_hand: self.report.summary.total_bottled_on_hand,
            finalized_at: self.finalized_at,
        }
    }
}

/// Listing row for stored reports.
#[derive(Debug, Clone, Serialize)]
pub struct ReportStatusView {
    pub report_id: ReportId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: &'static str,
    pub total_bulk_on_hand: f64,
    pub total_bottled_on_hand: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
}
