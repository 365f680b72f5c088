use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::production::{LotServiceError, RepositoryError};
use crate::workflows::ttb::{LedgerImportError, ReportServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Ledger(LedgerImportError),
    Lots(LotServiceError),
    Reports(ReportServiceError),
    Input(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Ledger(err) => write!(f, "ledger import error: {}", err),
            AppError::Lots(err) => write!(f, "lot error: {}", err),
            AppError::Reports(err) => write!(f, "report error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Ledger(err) => Some(err),
            AppError::Lots(err) => Some(err),
            AppError::Reports(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Ledger(_) | AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Lots(LotServiceError::NotFound(_))
            | AppError::Reports(ReportServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Lots(LotServiceError::NotEligible { .. })
            | AppError::Lots(LotServiceError::NotNearlyReady { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Reports(
                ReportServiceError::AlreadyFinalized(_)
                | ReportServiceError::Repository(RepositoryError::Conflict),
            ) => StatusCode::CONFLICT,
            AppError::Reports(
                ReportServiceError::Period(_)
                | ReportServiceError::InvalidGallons(_)
                | ReportServiceError::Import(_),
            ) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Lots(LotServiceError::Repository(_))
            | AppError::Reports(ReportServiceError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LedgerImportError> for AppError {
    fn from(value: LedgerImportError) -> Self {
        Self::Ledger(value)
    }
}

impl From<LotServiceError> for AppError {
    fn from(value: LotServiceError) -> Self {
        Self::Lots(value)
    }
}

impl From<ReportServiceError> for AppError {
    fn from(value: ReportServiceError) -> Self {
        Self::Reports(value)
    }
}
