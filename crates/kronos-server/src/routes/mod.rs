//! HTTP route handlers — the `/api/v1` surface.

pub mod composio;
pub mod integrations;

use std::sync::Arc;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kronos_core::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Header carrying the authenticated caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(service_health))
        .nest("/integrations", integrations::routes())
        .nest("/composio", composio::routes())
}

/// GET /api/v1/health — liveness and connector configuration.
async fn service_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "composio_configured": state.integrations.connector_available(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Caller identity taken from the `X-User-Id` header.
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CurrentUser(v.to_string()))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Missing user identity" })),
            ))
    }
}

/// Map a service error to a status code and JSON error body.
pub fn error_response(err: &Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Vendor { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) | Error::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        warn!("Request failed: {}", err);
    }
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}
