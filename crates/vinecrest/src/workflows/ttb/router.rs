use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::report::ReportId;
use super::repository::{ReportRepository, TransactionRepository};
use super::service::{ReportServiceError, TtbReportService};
use super::tax_class::{determine_tax_class, TaxClass, WineType};
use super::transactions::{Transaction, TransactionId, TransactionKind};
use crate::workflows::production::domain::LotId;
use crate::workflows::production::repository::RepositoryError;
use crate::workflows::Owner;

const GENERATION_FAILED: &str = "failed to generate report, try again";

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Ledger entry posted by the cellar app. Without an explicit class the
/// wine type and alcohol reading decide it.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    pub id: String,
    pub lot_id: String,
    pub kind: TransactionKind,
    pub gallons: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub tax_class: Option<TaxClass>,
    #[serde(default)]
    pub wine_type: Option<WineType>,
    #[serde(default)]
    pub alcohol_pct: Option<f64>,
}

pub fn ttb_router<T, R>(service: Arc<TtbReportService<T, R>>) -> Router
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/ttb/reports",
            get(list_handler::<T, R>).post(generate_handler::<T, R>),
        )
        .route("/api/v1/ttb/reports/:report_id", get(get_handler::<T, R>))
        .route(
            "/api/v1/ttb/reports/:report_id/finalize",
            post(finalize_handler::<T, R>),
        )
        .route(
            "/api/v1/ttb/transactions",
            post(record_transaction_handler::<T, R>),
        )
        .route("/api/v1/ttb/ledger", post(import_ledger_handler::<T, R>))
        .with_state(service)
}

pub(crate) async fn generate_handler<T, R>(
    State(service): State<Arc<TtbReportService<T, R>>>,
    Owner(owner): Owner,
    Json(request): Json<GenerateReportRequest>,
) -> Response
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    match service.save_draft(&owner, request.period_start, request.period_end, Utc::now()) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(ReportServiceError::Repository(error)) => {
            warn!(%owner, %error, "report generation failed");
            let payload = json!({ "error": GENERATION_FAILED });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<T, R>(
    State(service): State<Arc<TtbReportService<T, R>>>,
    Owner(owner): Owner,
) -> Response
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    match service.list(&owner) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<T, R>(
    State(service): State<Arc<TtbReportService<T, R>>>,
    Owner(owner): Owner,
    Path(report_id): Path<String>,
) -> Response
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    match service.get(&owner, &ReportId(report_id)) {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<T, R>(
    State(service): State<Arc<TtbReportService<T, R>>>,
    Owner(owner): Owner,
    Path(report_id): Path<String>,
) -> Response
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    match service.finalize(&owner, &ReportId(report_id), Utc::now()) {
        Ok(stored) => (StatusCode::OK, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_transaction_handler<T, R>(
    State(service): State<Arc<TtbReportService<T, R>>>,
    Owner(owner): Owner,
    Json(request): Json<RecordTransactionRequest>,
) -> Response
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    let tax_class = request.tax_class.unwrap_or_else(|| {
        determine_tax_class(
            request.wine_type.unwrap_or(WineType::Still),
            request.alcohol_pct,
        )
    });
    let transaction = Transaction {
        id: TransactionId(request.id),
        owner,
        lot_id: LotId(request.lot_id),
        kind: request.kind,
        tax_class,
        gallons: request.gallons,
        date: request.date,
    };

    match service.record_transaction(transaction) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_ledger_handler<T, R>(
    State(service): State<Arc<TtbReportService<T, R>>>,
    Owner(owner): Owner,
    body: String,
) -> Response
where
    T: TransactionRepository + 'static,
    R: ReportRepository + 'static,
{
    match service.import_ledger(&owner, body.as_bytes()) {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ReportServiceError) -> Response {
    let status = match &error {
        ReportServiceError::Period(_)
        | ReportServiceError::InvalidGallons(_)
        | ReportServiceError::Import(_) => StatusCode::BAD_REQUEST,
        ReportServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ReportServiceError::AlreadyFinalized(_)
        | ReportServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReportServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
