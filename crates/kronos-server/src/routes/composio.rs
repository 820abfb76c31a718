//! Connector routes — toolkits, connections, auth configs, tool execution.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use kronos_composio::{AuthConfigQuery, AuthConfigUpdate, NewAuthConfig};
use kronos_integrations::{ConnectionInitiateRequest, ToolExecuteRequest};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{error_response, CurrentUser};
use crate::state::AppState;

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(connector_health))
        .route("/toolkits", get(list_toolkits))
        .route("/toolkits/{slug}/actions", get(list_toolkit_actions))
        .route("/connections", get(list_connections))
        .route("/connections/initiate", post(initiate_connection))
        .route("/connections/account/{account_id}", get(get_connection))
        .route("/auth-configs", get(list_auth_configs).post(create_auth_config))
        .route(
            "/auth-configs/{auth_config_id}",
            get(get_auth_config)
                .put(update_auth_config)
                .delete(delete_auth_config),
        )
        .route("/tools/execute", post(execute_tool))
}

/// `?search=&limit=` for toolkit and action listings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingQuery {
    search: Option<String>,
    limit: Option<usize>,
}

fn ok<T: serde::Serialize>(value: T) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::to_value(value).unwrap_or_default()),
    )
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// GET /api/v1/composio/health
async fn connector_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let configured = state.config.composio.is_configured();
    let message = if configured {
        "Composio integration is ready"
    } else {
        "Composio API key not configured"
    };
    Json(json!({
        "configured": configured,
        "base_url": state.config.composio.base_url,
        "message": message,
    }))
}

/// GET /api/v1/composio/toolkits?search=&limit=
async fn list_toolkits(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    match state
        .connector
        .toolkits(query.search.as_deref(), query.limit)
        .await
    {
        Ok(toolkits) => ok(toolkits),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/composio/toolkits/:slug/actions?limit=
async fn list_toolkit_actions(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(slug): Path<String>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    match state.connector.toolkit_actions(&slug, query.limit).await {
        Ok(actions) => ok(actions),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/composio/connections
async fn list_connections(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> impl IntoResponse {
    match state.connector.connections(&user_id).await {
        Ok(accounts) => ok(accounts),
        Err(e) => error_response(&e),
    }
}

/// POST /api/v1/composio/connections/initiate
async fn initiate_connection(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ConnectionInitiateRequest>,
) -> impl IntoResponse {
    match state.connector.initiate_connection(&user_id, request).await {
        Ok(created) => ok(created),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/composio/connections/account/:account_id
async fn get_connection(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(account_id): Path<String>,
) -> impl IntoResponse {
    match state.connector.connection(&user_id, &account_id).await {
        Ok(account) => ok(account),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/composio/auth-configs
async fn list_auth_configs(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<AuthConfigQuery>,
) -> impl IntoResponse {
    match state.connector.auth_configs(&query).await {
        Ok(page) => ok(page),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/composio/auth-configs/:id
async fn get_auth_config(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(auth_config_id): Path<String>,
) -> impl IntoResponse {
    match state.connector.auth_config(&auth_config_id).await {
        Ok(config) => ok(config),
        Err(e) => error_response(&e),
    }
}

/// POST /api/v1/composio/auth-configs
async fn create_auth_config(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<NewAuthConfig>,
) -> impl IntoResponse {
    info!(user_id = %user_id, toolkit = %request.toolkit_slug, "Creating auth config");
    match state.connector.create_auth_config(request).await {
        Ok(config) => ok(config),
        Err(e) => error_response(&e),
    }
}

/// PUT /api/v1/composio/auth-configs/:id
async fn update_auth_config(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Path(auth_config_id): Path<String>,
    Json(update): Json<AuthConfigUpdate>,
) -> impl IntoResponse {
    match state
        .connector
        .update_auth_config(&auth_config_id, update)
        .await
    {
        Ok(config) => ok(config),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/v1/composio/auth-configs/:id
async fn delete_auth_config(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(auth_config_id): Path<String>,
) -> impl IntoResponse {
    info!(user_id = %user_id, auth_config_id = %auth_config_id, "Deleting auth config");
    match state.connector.delete_auth_config(&auth_config_id).await {
        Ok(()) => ok(json!({
            "success": true,
            "message": "Auth config deleted successfully",
        })),
        Err(e) => error_response(&e),
    }
}

/// POST /api/v1/composio/tools/execute
async fn execute_tool(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ToolExecuteRequest>,
) -> impl IntoResponse {
    match state.connector.execute_tool(&user_id, request).await {
        Ok(result) => ok(result),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{get, send, test_router};
    use super::super::USER_ID_HEADER;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, "u1")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_connector_health_reads_config() {
        let (status, body) = send(test_router(true), get("/api/v1/composio/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], false);
        assert_eq!(body["base_url"], "https://backend.composio.dev");
    }

    #[tokio::test]
    async fn test_toolkits_and_actions() {
        let (status, body) = send(test_router(true), get("/api/v1/composio/toolkits?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["slug"], "slack");

        let (status, body) = send(
            test_router(true),
            get("/api/v1/composio/toolkits/github/actions"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array());

        let (status, _) = send(test_router(false), get("/api/v1/composio/toolkits")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_connections_are_scoped_to_caller() {
        let (status, body) = send(test_router(true), get("/api/v1/composio/connections")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = send(
            test_router(true),
            get("/api/v1/composio/connections/account/a1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["account_id"], "a1");

        let (status, _) = send(
            test_router(true),
            get("/api/v1/composio/connections/account/someone-elses"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_auth_config_routes() {
        let (status, body) = send(test_router(true), get("/api/v1/composio/auth-configs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["type"], "custom");

        let (status, body) = send(test_router(true), get("/api/v1/composio/auth-configs/ac_1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["toolkit"], "github");

        let (status, body) = send(
            test_router(true),
            json_request(
                "POST",
                "/api/v1/composio/auth-configs",
                serde_json::json!({ "name": "Mine", "toolkit_slug": "github" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["auth_scheme"], "OAUTH2");

        let (status, _) = send(
            test_router(true),
            json_request(
                "PUT",
                "/api/v1/composio/auth-configs/ac_1",
                serde_json::json!({ "name": "Renamed" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            test_router(true),
            json_request("DELETE", "/api/v1/composio/auth-configs/ac_1", serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(
            test_router(true),
            json_request(
                "POST",
                "/api/v1/composio/auth-configs",
                serde_json::json!({ "name": " ", "toolkit_slug": "github" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_execute_tool_route() {
        let (status, body) = send(
            test_router(true),
            json_request(
                "POST",
                "/api/v1/composio/tools/execute",
                serde_json::json!({ "action_name": "SLACK_SEND", "params": { "text": "hi" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["text"], "hi");

        let (status, _) = send(
            test_router(true),
            json_request(
                "POST",
                "/api/v1/composio/tools/execute",
                serde_json::json!({
                    "action_name": "SLACK_SEND",
                    "connected_account_id": "../auth_configs/ac_1"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_connector_routes_require_identity() {
        let request = Request::get("/api/v1/composio/auth-configs")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(test_router(true), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
