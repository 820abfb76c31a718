//! Configuration loaded from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_COMPOSIO_BASE_URL: &str = "https://backend.composio.dev";
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 60;

/// Connector (Composio) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposioConfig {
    /// API key. Empty means the connector is not configured.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Base URL of the Composio backend.
    pub base_url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl ComposioConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ComposioConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_COMPOSIO_BASE_URL.into(),
            timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
        }
    }
}

/// Top-level Kronos configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KronosConfig {
    /// HTTP server port.
    pub port: u16,
    pub composio: ComposioConfig,
}

impl KronosConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let composio = ComposioConfig {
            api_key: var("COMPOSIO_API_KEY").unwrap_or_default(),
            base_url: var("COMPOSIO_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_COMPOSIO_BASE_URL.into()),
            timeout_secs: var("COMPOSIO_CONNECTION_TIMEOUT")
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
        };

        Self { port, composio }
    }
}
