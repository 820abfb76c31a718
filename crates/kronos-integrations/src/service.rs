//! Integration service — dashboard assembly, stats, and account actions.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use kronos_composio::{ConnectedAccount, ConnectorClient, InitiateConnection, Toolkit};
use kronos_core::{Error, Result};
use tracing::{error, info, warn};

use crate::aggregate::{group_by_provider, to_connection};
use crate::catalog::{categorize, category_key, display_name};
use crate::connector::owned_account;
use crate::health::{classify_counts, health_message};
use crate::types::*;

/// Toolkits requested per dashboard.
pub const TOOLKIT_LIMIT: usize = 100;
/// Actions requested per toolkit when counting capabilities.
pub const ACTION_SAMPLE_LIMIT: usize = 10;
/// Length of `popular_integrations`.
pub const POPULAR_LIMIT: usize = 5;
/// Action-count requests in flight at once per dashboard.
pub const ACTION_FETCH_CONCURRENCY: usize = 8;

/// Builds dashboards and stats over an injected connector client.
pub struct IntegrationService {
    client: Arc<dyn ConnectorClient>,
}

impl IntegrationService {
    pub fn new(client: Arc<dyn ConnectorClient>) -> Self {
        Self { client }
    }

    pub fn connector_available(&self) -> bool {
        self.client.is_available()
    }

    // ---------------------------------------------------------------
    // Dashboard
    // ---------------------------------------------------------------

    /// Build the complete integration dashboard for a user. Never fails:
    /// connector problems yield empty or zero data.
    pub async fn get_integration_dashboard(&self, user_id: &str) -> IntegrationDashboard {
        if !self.client.is_available() {
            warn!(user_id, "Composio connector not available");
            return IntegrationDashboard::unavailable(user_id);
        }

        let toolkits = match self.client.list_toolkits(None, TOOLKIT_LIMIT).await {
            Ok(toolkits) => toolkits,
            Err(e) => {
                error!(user_id, operation = "list_toolkits", "Failed to get toolkits: {}", e);
                Vec::new()
            }
        };

        let accounts = match self.client.list_connected_accounts(user_id).await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!(
                    user_id,
                    operation = "list_connected_accounts",
                    "Failed to get connections: {}",
                    e
                );
                Vec::new()
            }
        };

        let toolkits: Vec<&Toolkit> = toolkits.iter().filter(|t| !t.slug.is_empty()).collect();
        let action_futures: Vec<_> = toolkits.iter().map(|t| self.action_count(&t.slug)).collect();
        let action_counts: Vec<usize> = stream::iter(action_futures)
            .buffered(ACTION_FETCH_CONCURRENCY)
            .collect()
            .await;

        let by_provider = group_by_provider(&accounts);
        let mut integrations: Vec<IntegrationSummary> = toolkits
            .iter()
            .zip(action_counts)
            .map(|(toolkit, available_actions)| {
                let accounts = by_provider
                    .get(&toolkit.slug.to_lowercase())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                build_summary(toolkit, accounts, available_actions)
            })
            .collect();

        integrations.sort_by(|a, b| {
            b.total_connections
                .cmp(&a.total_connections)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        let dashboard = assemble_dashboard(user_id, integrations);
        info!(
            user_id,
            integrations = dashboard.total_integrations,
            connected = dashboard.connected_integrations,
            connections = dashboard.total_connections,
            "Integration dashboard assembled"
        );
        dashboard
    }

    /// Number of actions a toolkit exposes (sampled); 0 on failure.
    async fn action_count(&self, toolkit: &str) -> usize {
        match self
            .client
            .list_toolkit_actions(toolkit, ACTION_SAMPLE_LIMIT)
            .await
        {
            Ok(actions) => actions.len(),
            Err(e) => {
                warn!(toolkit, operation = "list_toolkit_actions", "Failed to get actions: {}", e);
                0
            }
        }
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    /// Category analytics derived from the user's dashboard.
    pub async fn get_integration_stats(&self, user_id: &str) -> IntegrationStats {
        let dashboard = self.get_integration_dashboard(user_id).await;
        stats_from_dashboard(&dashboard)
    }

    // ---------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------

    /// Perform a connect/disconnect/refresh/enable/disable action.
    pub async fn perform_action(
        &self,
        user_id: &str,
        request: IntegrationActionRequest,
    ) -> Result<IntegrationActionResponse> {
        if !self.client.is_available() {
            return Err(Error::Unavailable("Composio service not available".into()));
        }

        let action = IntegrationAction::parse(&request.action)
            .ok_or_else(|| Error::Validation(format!("Unknown action: {}", request.action)))?;

        match action {
            IntegrationAction::Connect => self.connect(user_id, request).await,
            _ => self.account_action(user_id, action, request).await,
        }
    }

    async fn connect(
        &self,
        user_id: &str,
        request: IntegrationActionRequest,
    ) -> Result<IntegrationActionResponse> {
        let redirect_url = request
            .parameters
            .as_ref()
            .and_then(|p| p.get("redirect_url"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let created = self
            .client
            .initiate_connection(InitiateConnection {
                user_id: user_id.to_string(),
                toolkit: request.provider.clone(),
                auth_config_id: request.auth_config_id,
                redirect_url,
            })
            .await?;

        info!(user_id, provider = %request.provider, "Connection initiated");
        Ok(IntegrationActionResponse {
            success: true,
            message: format!("Connection initiated for {}", request.provider),
            redirect_url: created.redirect_url.clone(),
            connection_id: Some(created.connection_id.clone()),
            data: Some(serde_json::to_value(&created)?),
        })
    }

    /// Disconnect, refresh, enable or disable an account the user owns.
    async fn account_action(
        &self,
        user_id: &str,
        action: IntegrationAction,
        request: IntegrationActionRequest,
    ) -> Result<IntegrationActionResponse> {
        let connection_id = request
            .connection_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::Validation(format!("Connection ID required for {} action", action))
            })?;

        owned_account(self.client.as_ref(), user_id, &connection_id).await?;

        match action {
            IntegrationAction::Disconnect => {
                self.client.delete_connected_account(&connection_id).await?
            }
            IntegrationAction::Refresh => {
                self.client.refresh_connected_account(&connection_id).await?
            }
            _ => {
                self.client
                    .set_connected_account_enabled(
                        &connection_id,
                        action == IntegrationAction::Enable,
                    )
                    .await?
            }
        }

        info!(
            user_id,
            provider = %request.provider,
            %action,
            connection_id = %connection_id,
            "Integration action completed"
        );
        Ok(IntegrationActionResponse {
            success: true,
            message: format!("Successfully {} {}", past_tense(action), request.provider),
            redirect_url: None,
            connection_id: Some(connection_id),
            data: None,
        })
    }
}

fn past_tense(action: IntegrationAction) -> &'static str {
    match action {
        IntegrationAction::Connect => "connected",
        IntegrationAction::Disconnect => "disconnected",
        IntegrationAction::Refresh => "refreshed",
        IntegrationAction::Enable => "enabled",
        IntegrationAction::Disable => "disabled",
    }
}

/// Join one toolkit with its connected accounts.
pub fn build_summary(
    toolkit: &Toolkit,
    accounts: &[&ConnectedAccount],
    available_actions: usize,
) -> IntegrationSummary {
    let connections: Vec<IntegrationConnection> =
        accounts.iter().map(|a| to_connection(a)).collect();
    let counts = ConnectionCounts::tally(&connections);
    let health = classify_counts(&counts);

    IntegrationSummary {
        provider: toolkit.slug.clone(),
        display_name: display_name(&toolkit.slug),
        description: Some(toolkit.description.clone()),
        logo_url: Some(toolkit.logo.clone()),
        categories: categorize(&toolkit.slug, &toolkit.categories),
        total_connections: counts.total,
        active_connections: counts.active,
        inactive_connections: counts.inactive,
        error_connections: counts.error,
        health,
        health_message: Some(health_message(health, &counts)),
        has_auth_config: false,
        auth_schemes: toolkit.auth_schemes.clone(),
        available_actions,
        last_connection_attempt: connections.iter().filter_map(|c| c.created_at).max(),
        connections,
    }
}

/// Derive dashboard totals from already-sorted summaries.
pub fn assemble_dashboard(user_id: &str, integrations: Vec<IntegrationSummary>) -> IntegrationDashboard {
    let categories: BTreeSet<String> = integrations
        .iter()
        .flat_map(|i| i.categories.iter().cloned())
        .collect();

    let mut connected: Vec<&IntegrationSummary> = integrations
        .iter()
        .filter(|i| i.total_connections > 0)
        .collect();
    connected.sort_by_key(|i| Reverse(i.total_connections));

    IntegrationDashboard {
        user_id: user_id.to_string(),
        total_integrations: integrations.len(),
        connected_integrations: connected.len(),
        total_connections: integrations.iter().map(|i| i.total_connections).sum(),
        healthy_connections: integrations.iter().map(|i| i.active_connections).sum(),
        categories: categories.into_iter().collect(),
        popular_integrations: connected
            .iter()
            .take(POPULAR_LIMIT)
            .map(|i| i.provider.clone())
            .collect(),
        composio_health: true,
        last_updated: Utc::now(),
        integrations,
    }
}

/// Group a dashboard's integrations by category.
pub fn stats_from_dashboard(dashboard: &IntegrationDashboard) -> IntegrationStats {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (Vec<String>, usize)> = HashMap::new();

    for integration in &dashboard.integrations {
        for category in &integration.categories {
            let (services, connected) = groups.entry(category.clone()).or_insert_with(|| {
                order.push(category.clone());
                (Vec::new(), 0)
            });
            if services.contains(&integration.provider) {
                continue;
            }
            services.push(integration.provider.clone());
            if integration.total_connections > 0 {
                *connected += 1;
            }
        }
    }

    let mut categories: Vec<IntegrationCategory> = order
        .into_iter()
        .filter_map(|name| {
            let (services, connected_count) = groups.remove(&name)?;
            Some(IntegrationCategory {
                name: category_key(&name),
                service_count: services.len(),
                connected_count,
                services,
                display_name: name,
                description: None,
                icon: None,
            })
        })
        .collect();
    categories.sort_by_key(|c| Reverse(c.connected_count));

    IntegrationStats {
        total_available: dashboard.total_integrations,
        total_connected: dashboard.connected_integrations,
        total_connections: dashboard.total_connections,
        active_connections: dashboard.healthy_connections,
        failed_connections: dashboard.failed_connections(),
        categories,
        connection_trend: Vec::new(),
    }
}
