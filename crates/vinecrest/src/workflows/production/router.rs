use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{Lot, LotId};
use super::repository::LotRepository;
use super::service::{LotService, LotServiceError};
use crate::workflows::Owner;

/// Router exposing readiness, bottling transitions, and tax-class refresh.
pub fn lot_router<L>(service: Arc<LotService<L>>) -> Router
where
    L: LotRepository + 'static,
{
    Router::new()
        .route("/api/v1/lots", post(register_handler::<L>))
        .route("/api/v1/lots/bottling-queue", get(queue_handler::<L>))
        .route(
            "/api/v1/lots/tax-classes/refresh",
            post(refresh_tax_classes_handler::<L>),
        )
        .route(
            "/api/v1/lots/:lot_id/readiness",
            get(readiness_handler::<L>),
        )
        .route(
            "/api/v1/lots/:lot_id/ready-to-bottle",
            post(ready_to_bottle_handler::<L>),
        )
        .route("/api/v1/lots/:lot_id/bottle", post(bottle_handler::<L>))
        .with_state(service)
}

pub(crate) async fn register_handler<L>(
    State(service): State<Arc<LotService<L>>>,
    Owner(owner): Owner,
    Json(mut lot): Json<Lot>,
) -> Response
where
    L: LotRepository + 'static,
{
    lot.owner = owner;
    match service.register(lot) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn readiness_handler<L>(
    State(service): State<Arc<LotService<L>>>,
    Owner(owner): Owner,
    Path(lot_id): Path<String>,
) -> Response
where
    L: LotRepository + 'static,
{
    match service.assess(&owner, &LotId(lot_id), Utc::now()) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queue_handler<L>(
    State(service): State<Arc<LotService<L>>>,
    Owner(owner): Owner,
) -> Response
where
    L: LotRepository + 'static,
{
    match service.bottling_queue(&owner) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ready_to_bottle_handler<L>(
    State(service): State<Arc<LotService<L>>>,
    Owner(owner): Owner,
    Path(lot_id): Path<String>,
) -> Response
where
    L: LotRepository + 'static,
{
    match service.mark_ready_to_bottle(&owner, &LotId(lot_id)) {
        Ok(lot) => (StatusCode::OK, Json(lot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bottle_handler<L>(
    State(service): State<Arc<LotService<L>>>,
    Owner(owner): Owner,
    Path(lot_id): Path<String>,
) -> Response
where
    L: LotRepository + 'static,
{
    match service.mark_bottled(&owner, &LotId(lot_id)) {
        Ok(lot) => (StatusCode::OK, Json(lot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn refresh_tax_classes_handler<L>(
    State(service): State<Arc<LotService<L>>>,
    Owner(owner): Owner,
) -> Response
where
    L: LotRepository + 'static,
{
    match service.batch_update_lot_tax_classes(&owner) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LotServiceError) -> Response {
    match error {
        LotServiceError::NotFound(lot_id) => {
            let payload = json!({
                "error": format!("lot {lot_id} not found"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        LotServiceError::NotEligible {
            ref lot_id,
            ref blockers,
        }
        | LotServiceError::NotNearlyReady {
            ref lot_id,
            ref blockers,
        } => {
            let payload = json!({
                "error": error.to_string(),
                "lot_id": lot_id,
                "blockers": blockers,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        LotServiceError::Repository(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
