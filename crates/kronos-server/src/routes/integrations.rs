//! Integration routes — dashboard, stats, filtering, details, actions.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use kronos_integrations::*;
use tracing::info;

use super::{error_response, CurrentUser};
use crate::state::AppState;

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/stats", get(get_stats))
        .route("/summary", get(get_summary))
        .route("/categories", get(get_categories))
        .route("/health", get(get_health))
        .route("/action", post(perform_action))
        .route("/{provider}/details", get(get_details))
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// GET /api/v1/integrations/dashboard
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Json<IntegrationDashboard> {
    Json(state.integrations.get_integration_dashboard(&user_id).await)
}

/// GET /api/v1/integrations/stats
async fn get_stats(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Json<IntegrationStats> {
    Json(state.integrations.get_integration_stats(&user_id).await)
}

/// GET /api/v1/integrations/summary?category=&connected_only=&search=
async fn get_summary(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Query(filter): Query<SummaryFilter>,
) -> Json<Vec<IntegrationSummary>> {
    let dashboard = state.integrations.get_integration_dashboard(&user_id).await;
    Json(filter.apply(&dashboard.integrations))
}

/// GET /api/v1/integrations/:provider/details
async fn get_details(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(provider): Path<String>,
) -> impl IntoResponse {
    let dashboard = state.integrations.get_integration_dashboard(&user_id).await;
    match find_integration(&dashboard, &provider) {
        Some(integration) => (
            StatusCode::OK,
            Json(serde_json::to_value(integration).unwrap_or_default()),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("Integration '{}' not found", provider)
            })),
        ),
    }
}

/// GET /api/v1/integrations/categories
async fn get_categories(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Json<serde_json::Value> {
    let stats = state.integrations.get_integration_stats(&user_id).await;
    Json(serde_json::json!({
        "total_categories": stats.categories.len(),
        "categories": stats.categories,
    }))
}

/// GET /api/v1/integrations/health
async fn get_health(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Json<SystemHealth> {
    let dashboard = state.integrations.get_integration_dashboard(&user_id).await;
    Json(SystemHealth::from_dashboard(&dashboard))
}

/// POST /api/v1/integrations/action
async fn perform_action(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<IntegrationActionRequest>,
) -> impl IntoResponse {
    info!(
        user_id = %user_id,
        provider = %request.provider,
        action = %request.action,
        "Integration action requested"
    );

    match state.integrations.perform_action(&user_id, request).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::to_value(response).unwrap_or_default()),
        ),
        Err(e) => error_response(&e),
    }
}
