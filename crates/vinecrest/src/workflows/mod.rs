pub mod production;
pub mod ttb;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use production::domain::OwnerId;

/// Header carrying the authenticated account id, set by the upstream auth proxy.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Extracts the owning account for tenant-scoped routes.
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match value {
            Some(owner) => Ok(Owner(OwnerId(owner.to_string()))),
            None => {
                let payload = json!({
                    "error": format!("missing {OWNER_HEADER} header"),
                });
                Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
            }
        }
    }
}
