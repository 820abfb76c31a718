//! Typed connector records handed to the rest of the system.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An integration-capable provider offered by the connector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolkit {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    /// Vendor-supplied categories; often empty.
    pub categories: Vec<String>,
    pub auth_schemes: Vec<String>,
}

/// One user's OAuth-linked account at a provider.
///
/// `status` and `created_at` are kept as the vendor sent them; the
/// dashboard normalises them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub account_id: String,
    pub status: String,
    /// Provider slug; empty when the vendor record carried none.
    pub provider: String,
    pub created_at: Option<String>,
    pub error: Option<String>,
}

/// A tool/action exposed by a toolkit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAction {
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Owning toolkit slug.
    pub toolkit: String,
    /// JSON schema of the action's arguments.
    pub input_parameters: Value,
}

/// Parameters for starting an OAuth connection.
#[derive(Debug, Clone, Default)]
pub struct InitiateConnection {
    pub user_id: String,
    pub toolkit: String,
    /// Auth config to connect through. When absent the first auth config
    /// registered for the toolkit is used.
    pub auth_config_id: Option<String>,
    pub redirect_url: Option<String>,
}

/// Result of starting an OAuth connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub connection_id: String,
    pub redirect_url: Option<String>,
    pub status: String,
}

// ---------------------------------------------------------------
// Auth configs
// ---------------------------------------------------------------

/// How a toolkit authenticates: OAuth app credentials, scheme, ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub id: String,
    pub uuid: String,
    /// `default` for vendor-managed configs, `custom` otherwise.
    #[serde(rename = "type")]
    pub kind: String,
    /// Toolkit slug.
    pub toolkit: String,
    pub name: String,
    pub status: String,
    pub no_of_connections: u64,
    pub auth_scheme: String,
    pub is_composio_managed: bool,
    pub created_at: Option<String>,
    pub last_updated_at: Option<String>,
}

/// One page of auth configs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfigPage {
    pub items: Vec<AuthConfig>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total_items: u64,
    pub next_cursor: Option<String>,
}

/// Filters for listing auth configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfigQuery {
    pub is_composio_managed: Option<bool>,
    pub toolkit_slug: Option<String>,
    pub show_disabled: bool,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

fn default_auth_scheme() -> String {
    "OAUTH2".to_string()
}

/// A custom auth config to register for a toolkit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthConfig {
    pub name: String,
    pub toolkit_slug: String,
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,
    #[serde(default)]
    pub credentials: Option<Map<String, Value>>,
    #[serde(default)]
    pub proxy_config: Option<Map<String, Value>>,
}

/// Partial update of an auth config; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfigUpdate {
    pub name: Option<String>,
    pub credentials: Option<Map<String, Value>>,
    pub proxy_config: Option<Map<String, Value>>,
}

// ---------------------------------------------------------------
// Tool execution
// ---------------------------------------------------------------

/// Run one action on behalf of a user.
#[derive(Debug, Clone, Default)]
pub struct ToolExecution {
    pub user_id: String,
    /// Action slug, e.g. `GITHUB_CREATE_ISSUE`.
    pub action: String,
    pub arguments: Map<String, Value>,
    pub connected_account_id: Option<String>,
}

/// Outcome reported by the connector for a tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
