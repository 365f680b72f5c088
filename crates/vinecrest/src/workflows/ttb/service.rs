use std::io::Read;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::ledger::{LedgerImportError, LedgerImporter};
use super::report::{generate_report, ReportError, ReportId, ReportPeriod, TtbReport};
use super::repository::{
    ReportRepository, ReportStatus, ReportStatusView, StoredReport, TransactionRepository,
};
use super::transactions::Transaction;
use crate::workflows::production::domain::OwnerId;
use crate::workflows::production::repository::RepositoryError;

/// Outcome of a ledger import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerImportSummary {
    pub imported: usize,
}

/// Service owning report generation and the draft/finalized lifecycle.
pub struct TtbReportService<T, R> {
    transactions: Arc<T>,
    reports: Arc<R>,
}

impl<T, R> TtbReportService<T, R>
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    pub fn new(transactions: Arc<T>, reports: Arc<R>) -> Self {
        Self {
            transactions,
            reports,
        }
    }

    pub fn generate(
        &self,
        owner: &OwnerId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<TtbReport, ReportServiceError> {
        self.generate_at(owner, period_start, period_end, Utc::now())
    }

    /// Build the report from every transaction dated on or before the period end.
    pub fn generate_at(
        &self,
        owner: &OwnerId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<TtbReport, ReportServiceError> {
        let period = ReportPeriod::new(period_start, period_end)?;
        let ledger = self
            .transactions
            .list_through(owner, period.end())
            .map_err(|error| {
                warn!(%owner, %error, "transaction fetch failed");
                error
            })?;

        let report = generate_report(owner, period, &ledger, now);
        info!(
            report_id = %report.id,
            transactions = ledger.len(),
            bulk_on_hand = report.summary.total_bulk_on_hand,
            bottled_on_hand = report.summary.total_bottled_on_hand,
            "ttb report generated"
        );
        Ok(report)
    }

    /// Generate and store a draft, replacing an earlier draft for the same period.
    pub fn save_draft(
        &self,
        owner: &OwnerId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<StoredReport, ReportServiceError> {
        let report = self.generate_at(owner, period_start, period_end, now)?;

        if let Some(existing) = self.reports.fetch(owner, &report.id)? {
            if existing.status == ReportStatus::Finalized {
                warn!(report_id = %report.id, "refusing to overwrite finalized report");
                return Err(ReportServiceError::AlreadyFinalized(report.id));
            }
        }

        Ok(self.reports.save(StoredReport::draft(report))?)
    }

    pub fn finalize(
        &self,
        owner: &OwnerId,
        report_id: &ReportId,
        now: DateTime<Utc>,
    ) -> Result<StoredReport, ReportServiceError> {
        let mut stored = self.get(owner, report_id)?;
        if stored.status == ReportStatus::Finalized {
            return Err(ReportServiceError::AlreadyFinalized(report_id.clone()));
        }

        stored.status = ReportStatus::Finalized;
        stored.finalized_at = Some(now);
        let saved = self.reports.save(stored)?;
        info!(report_id = %saved.report.id, "ttb report finalized");
        Ok(saved)
    }

    pub fn get(
        &self,
        owner: &OwnerId,
        report_id: &ReportId,
    ) -> Result<StoredReport, ReportServiceError> {
        self.reports
            .fetch(owner, report_id)?
            .ok_or_else(|| ReportServiceError::NotFound(report_id.clone()))
    }

    /// Stored reports, most recent period first.
    pub fn list(&self, owner: &OwnerId) -> Result<Vec<ReportStatusView>, ReportServiceError> {
        let mut views: Vec<ReportStatusView> = self
            .reports
            .list(owner)?
            .iter()
            .map(StoredReport::status_view)
            .collect();
        views.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        Ok(views)
    }

    pub fn record_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, ReportServiceError> {
        if !transaction.gallons.is_finite() || transaction.gallons < 0.0 {
            return Err(ReportServiceError::InvalidGallons(transaction.gallons));
        }
        Ok(self.transactions.insert(transaction)?)
    }

    /// Import a ledger export; nothing is written when any row is rejected,
    /// by the parser or by the repository.
    pub fn import_ledger<Rd: Read>(
        &self,
        owner: &OwnerId,
        reader: Rd,
    ) -> Result<LedgerImportSummary, ReportServiceError> {
        let transactions = LedgerImporter::from_reader(reader, owner)?;
        let imported = self.transactions.insert_many(transactions)?;

        info!(%owner, imported, "ledger imported");
        Ok(LedgerImportSummary { imported })
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Period(#[from] ReportError),
    #[error("report {0} not found")]
    NotFound(ReportId),
    #[error("report {0} is already finalized")]
    AlreadyFinalized(ReportId),
    #[error("gallons must be a non-negative number, got {0}")]
    InvalidGallons(f64),
    #[error(transparent)]
    Import(#[from] LedgerImportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
