//! TTB Form 5120.17 reporting: tax classes, the transaction ledger, and the
//! report lifecycle.

pub mod ledger;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod tax_class;
pub mod transactions;

#[cfg(test)]
mod tests;

pub use ledger::{LedgerImportError, LedgerImporter, LedgerRowError};
pub use report::{
    generate_report, ClassValues, ReportError, ReportId, ReportPeriod, ReportRow, ReportSummary,
    SectionRows, TaxClassSummary, TtbReport,
};
pub use repository::{
    ReportRepository, ReportStatus, ReportStatusView, StoredReport, TransactionRepository,
};
pub use router::ttb_router;
pub use service::{LedgerImportSummary, ReportServiceError, TtbReportService};
pub use tax_class::{determine_tax_class, TaxClass, WineType, TAX_CLASS_RULES_VERSION};
pub use transactions::{Direction, Posting, Section, Transaction, TransactionId, TransactionKind};
