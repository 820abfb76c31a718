//! Shared application state.

use std::sync::Arc;

use kronos_composio::ConnectorClient;
use kronos_core::KronosConfig;
use kronos_integrations::{ConnectorService, IntegrationService};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: KronosConfig,
    pub integrations: IntegrationService,
    pub connector: ConnectorService,
}

impl AppState {
    pub fn new(config: KronosConfig, client: Arc<dyn ConnectorClient>) -> Self {
        Self {
            config,
            integrations: IntegrationService::new(client.clone()),
            connector: ConnectorService::new(client),
        }
    }
}
