mod lines;
mod summary;
pub mod views;

pub use summary::{generate_report, ReportError, ReportPeriod};
pub use views::{
    ClassValues, ReportId, ReportRow, ReportSummary, SectionRows, TaxClassSummary, TtbReport,
};
