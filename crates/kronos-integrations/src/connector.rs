//! Connector passthrough — toolkits, connections, auth configs, tool runs.
//!
//! Thin, checked access to the connector for the management endpoints.
//! Unlike the dashboard these calls return errors: an unconfigured
//! connector is `Error::Unavailable`, and account-scoped calls only touch
//! accounts the caller owns.

use std::sync::Arc;

use kronos_composio::{
    AuthConfig, AuthConfigPage, AuthConfigQuery, AuthConfigUpdate, ConnectedAccount,
    ConnectionRequest, ConnectorClient, InitiateConnection, NewAuthConfig, ToolAction,
    ToolExecution, ToolExecutionResult, Toolkit,
};
use kronos_core::{Error, Result};
use tracing::{info, warn};

use crate::types::{ConnectionInitiateRequest, ToolExecuteRequest};

/// Default page size for toolkit and action listings.
pub const DEFAULT_LISTING_LIMIT: usize = 50;
/// Upper bound on any caller-supplied listing limit.
pub const MAX_LISTING_LIMIT: usize = 500;

/// Look up `account_id` among the user's connected accounts.
///
/// Fails with `Error::NotFound` when the account belongs to someone else
/// or does not exist.
pub async fn owned_account(
    client: &dyn ConnectorClient,
    user_id: &str,
    account_id: &str,
) -> Result<ConnectedAccount> {
    client
        .list_connected_accounts(user_id)
        .await?
        .into_iter()
        .find(|account| account.account_id == account_id)
        .ok_or_else(|| {
            warn!(user_id, account_id, "Connection not owned by user");
            Error::NotFound(format!("Connection '{}' not found", account_id))
        })
}

fn listing_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_LISTING_LIMIT)
        .clamp(1, MAX_LISTING_LIMIT)
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::Validation(format!("{} is required", field)))
    } else {
        Ok(value)
    }
}

/// Management operations over an injected connector client.
pub struct ConnectorService {
    client: Arc<dyn ConnectorClient>,
}

impl ConnectorService {
    pub fn new(client: Arc<dyn ConnectorClient>) -> Self {
        Self { client }
    }

    fn ensure_available(&self) -> Result<()> {
        if self.client.is_available() {
            Ok(())
        } else {
            Err(Error::Unavailable(
                "Composio service not available. Check COMPOSIO_API_KEY configuration.".into(),
            ))
        }
    }

    // ---------------------------------------------------------------
    // Toolkits
    // ---------------------------------------------------------------

    pub async fn toolkits(&self, search: Option<&str>, limit: Option<usize>) -> Result<Vec<Toolkit>> {
        self.ensure_available()?;
        self.client
            .list_toolkits(search.map(str::trim), listing_limit(limit))
            .await
    }

    pub async fn toolkit_actions(&self, toolkit: &str, limit: Option<usize>) -> Result<Vec<ToolAction>> {
        self.ensure_available()?;
        let toolkit = required(toolkit, "toolkit slug")?;
        self.client
            .list_toolkit_actions(toolkit, listing_limit(limit))
            .await
    }

    // ---------------------------------------------------------------
    // Connections
    // ---------------------------------------------------------------

    pub async fn connections(&self, user_id: &str) -> Result<Vec<ConnectedAccount>> {
        self.ensure_available()?;
        self.client.list_connected_accounts(user_id).await
    }

    /// Fresh details for one of the user's connections.
    pub async fn connection(&self, user_id: &str, account_id: &str) -> Result<ConnectedAccount> {
        self.ensure_available()?;
        owned_account(self.client.as_ref(), user_id, account_id).await?;
        self.client.get_connected_account(account_id).await
    }

    pub async fn initiate_connection(
        &self,
        user_id: &str,
        request: ConnectionInitiateRequest,
    ) -> Result<ConnectionRequest> {
        self.ensure_available()?;
        let provider = required(&request.provider, "provider")?.to_lowercase();

        let created = self
            .client
            .initiate_connection(InitiateConnection {
                user_id: user_id.to_string(),
                toolkit: provider.clone(),
                auth_config_id: request.auth_config_id.filter(|id| !id.trim().is_empty()),
                redirect_url: request.callback_url.filter(|u| !u.trim().is_empty()),
            })
            .await?;
        info!(user_id, provider = %provider, connection_id = %created.connection_id, "Connection initiated");
        Ok(created)
    }

    // ---------------------------------------------------------------
    // Auth configs
    // ---------------------------------------------------------------

    pub async fn auth_configs(&self, query: &AuthConfigQuery) -> Result<AuthConfigPage> {
        self.ensure_available()?;
        self.client.list_auth_configs(query).await
    }

    pub async fn auth_config(&self, auth_config_id: &str) -> Result<AuthConfig> {
        self.ensure_available()?;
        self.client.get_auth_config(auth_config_id).await
    }

    pub async fn create_auth_config(&self, mut request: NewAuthConfig) -> Result<AuthConfig> {
        self.ensure_available()?;
        request.name = required(&request.name, "name")?.to_string();
        request.toolkit_slug = required(&request.toolkit_slug, "toolkit_slug")?.to_lowercase();
        request.auth_scheme = required(&request.auth_scheme, "auth_scheme")?.to_uppercase();
        self.client.create_auth_config(request).await
    }

    /// Apply a partial update and return the stored result.
    pub async fn update_auth_config(
        &self,
        auth_config_id: &str,
        update: AuthConfigUpdate,
    ) -> Result<AuthConfig> {
        self.ensure_available()?;
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::Validation("name cannot be blank".into()));
        }
        self.client.update_auth_config(auth_config_id, update).await?;
        self.client.get_auth_config(auth_config_id).await
    }

    pub async fn delete_auth_config(&self, auth_config_id: &str) -> Result<()> {
        self.ensure_available()?;
        self.client.delete_auth_config(auth_config_id).await
    }

    // ---------------------------------------------------------------
    // Tools
    // ---------------------------------------------------------------

    /// Run an action for the user. Vendor-side failures come back as an
    /// unsuccessful result rather than an error.
    pub async fn execute_tool(
        &self,
        user_id: &str,
        request: ToolExecuteRequest,
    ) -> Result<ToolExecutionResult> {
        self.ensure_available()?;
        let action = required(&request.action_name, "action_name")?.to_string();

        let connected_account_id = request.connected_account_id.filter(|id| !id.is_empty());
        if let Some(account_id) = &connected_account_id {
            owned_account(self.client.as_ref(), user_id, account_id).await?;
        }

        let execution = ToolExecution {
            user_id: user_id.to_string(),
            action: action.clone(),
            arguments: request.params,
            connected_account_id,
        };
        match self.client.execute_tool(execution).await {
            Ok(result) => Ok(result),
            Err(e @ (Error::Vendor { .. } | Error::Http(_) | Error::Json(_))) => {
                warn!(user_id, action = %action, "Tool execution failed: {}", e);
                Ok(ToolExecutionResult {
                    success: false,
                    data: None,
                    error: Some(e.to_string()),
                })
            }
            Err(e) => Err(e),
        }
    }
}
