//! Dashboard types — matching the integration API response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a single connected account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Active,
    Inactive,
    Pending,
    Error,
    Disabled,
}

/// Coarse health verdict for one provider's connection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionHealth {
    Healthy,
    Warning,
    Error,
    Unknown,
}

/// Individual connection within an integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConnection {
    pub account_id: String,
    pub status: IntegrationStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub last_used: Option<DateTime<Utc>>,
    /// Only present when `status` is `Error`.
    pub error_message: Option<String>,
}

/// Per-status tallies over one provider's connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub error: usize,
}

impl ConnectionCounts {
    /// Count connections by status. Anything neither active nor errored
    /// (inactive, pending, disabled) counts as inactive, so
    /// `total == active + inactive + error` always holds.
    pub fn tally(connections: &[IntegrationConnection]) -> Self {
        let mut counts = Self {
            total: connections.len(),
            ..Default::default()
        };
        for connection in connections {
            match connection.status {
                IntegrationStatus::Active => counts.active += 1,
                IntegrationStatus::Error => counts.error += 1,
                IntegrationStatus::Inactive
                | IntegrationStatus::Pending
                | IntegrationStatus::Disabled => counts.inactive += 1,
            }
        }
        counts
    }
}

/// Summary of a single integration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSummary {
    /// Provider slug (e.g. "gmail", "slack").
    pub provider: String,
    pub display_name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub categories: Vec<String>,

    pub total_connections: usize,
    pub active_connections: usize,
    pub inactive_connections: usize,
    pub error_connections: usize,

    pub health: ConnectionHealth,
    pub health_message: Option<String>,

    pub has_auth_config: bool,
    pub auth_schemes: Vec<String>,

    pub available_actions: usize,
    pub last_connection_attempt: Option<DateTime<Utc>>,

    pub connections: Vec<IntegrationConnection>,
}

/// Complete integration dashboard for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationDashboard {
    pub user_id: String,
    /// Number of integrations offered by the connector.
    pub total_integrations: usize,
    /// Integrations with at least one connection.
    pub connected_integrations: usize,
    pub total_connections: usize,
    /// Active connections across all integrations.
    pub healthy_connections: usize,

    /// Deduplicated, sorted.
    pub categories: Vec<String>,
    /// Up to five most-connected provider slugs.
    pub popular_integrations: Vec<String>,

    pub integrations: Vec<IntegrationSummary>,

    /// Whether the connector was reachable/configured.
    pub composio_health: bool,
    pub last_updated: DateTime<Utc>,
}

impl IntegrationDashboard {
    /// Empty dashboard returned when the connector is unavailable.
    pub fn unavailable(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_integrations: 0,
            connected_integrations: 0,
            total_connections: 0,
            healthy_connections: 0,
            categories: Vec::new(),
            popular_integrations: Vec::new(),
            integrations: Vec::new(),
            composio_health: false,
            last_updated: Utc::now(),
        }
    }

    pub fn failed_connections(&self) -> usize {
        self.integrations.iter().map(|i| i.error_connections).sum()
    }
}

/// Integrations grouped under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationCategory {
    /// snake_case key derived from the display name.
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub service_count: usize,
    pub connected_count: usize,
    pub services: Vec<String>,
}

/// Integration statistics for analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationStats {
    pub total_available: usize,
    pub total_connected: usize,
    pub total_connections: usize,
    pub active_connections: usize,
    pub failed_connections: usize,
    pub categories: Vec<IntegrationCategory>,
    /// Reserved for charting; currently always empty.
    pub connection_trend: Vec<serde_json::Value>,
}

/// Request to perform an action on an integration.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationActionRequest {
    pub provider: String,
    /// connect, disconnect, refresh, enable or disable.
    pub action: String,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub auth_config_id: Option<String>,
    #[serde(default)]
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Response from an integration action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Request to start an OAuth connection through the connector routes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionInitiateRequest {
    pub provider: String,
    #[serde(default, alias = "redirect_url")]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub auth_config_id: Option<String>,
}

/// Request to run one connector action.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolExecuteRequest {
    pub action_name: String,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub connected_account_id: Option<String>,
}

/// Supported integration actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationAction {
    Connect,
    Disconnect,
    Refresh,
    Enable,
    Disable,
}

impl IntegrationAction {
    /// Parse an action name, ignoring case.
    pub fn parse(action: &str) -> Option<Self> {
        match action.trim().to_lowercase().as_str() {
            "connect" => Some(Self::Connect),
            "disconnect" => Some(Self::Disconnect),
            "refresh" => Some(Self::Refresh),
            "enable" => Some(Self::Enable),
            "disable" => Some(Self::Disable),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Refresh => "refresh",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

impl std::fmt::Display for IntegrationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
