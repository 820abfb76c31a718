//! Scripted connector shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kronos_composio::{
    AuthConfig, AuthConfigPage, AuthConfigQuery, AuthConfigUpdate, ConnectedAccount,
    ConnectionRequest, ConnectorClient, InitiateConnection, NewAuthConfig, ToolAction,
    ToolExecution, ToolExecutionResult, Toolkit,
};
use kronos_core::{Error, Result};
use parking_lot::Mutex;

#[derive(Default)]
pub struct ScriptedClient {
    pub available: bool,
    pub toolkits: Option<Vec<Toolkit>>,
    pub accounts: Option<Vec<ConnectedAccount>>,
    /// Toolkits whose action listing fails.
    pub failing_actions: Vec<String>,
    pub auth_configs: Vec<AuthConfig>,
    /// Actions whose execution the vendor rejects.
    pub failing_tools: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.lock().iter().any(|c| c == call)
    }

    pub fn called_prefix(&self, prefix: &str) -> bool {
        self.calls.lock().iter().any(|c| c.starts_with(prefix))
    }
}

pub fn vendor_down() -> Error {
    Error::Vendor {
        status: 503,
        message: "upstream down".into(),
    }
}

#[async_trait]
impl ConnectorClient for ScriptedClient {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn list_toolkits(&self, search: Option<&str>, limit: usize) -> Result<Vec<Toolkit>> {
        match search {
            Some(search) => self.record(format!("list_toolkits:{}:{}", limit, search)),
            None => self.record(format!("list_toolkits:{}", limit)),
        }
        self.toolkits.clone().ok_or_else(vendor_down)
    }

    async fn list_connected_accounts(&self, user_id: &str) -> Result<Vec<ConnectedAccount>> {
        self.record(format!("list_connected_accounts:{}", user_id));
        self.accounts.clone().ok_or_else(vendor_down)
    }

    async fn get_connected_account(&self, account_id: &str) -> Result<ConnectedAccount> {
        self.record(format!("get_connected_account:{}", account_id));
        self.accounts
            .iter()
            .flatten()
            .find(|a| a.account_id == account_id)
            .cloned()
            .ok_or_else(|| Error::Vendor {
                status: 404,
                message: "no such account".into(),
            })
    }

    async fn list_toolkit_actions(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolAction>> {
        self.record(format!("list_toolkit_actions:{}:{}", toolkit, limit));
        if self.failing_actions.iter().any(|t| t == toolkit) {
            return Err(vendor_down());
        }
        Ok(vec![ToolAction::default(); 4])
    }

    async fn initiate_connection(&self, request: InitiateConnection) -> Result<ConnectionRequest> {
        self.record(format!(
            "initiate:{}:{}:{}",
            request.user_id,
            request.toolkit,
            request.redirect_url.unwrap_or_default()
        ));
        Ok(ConnectionRequest {
            connection_id: "ca_new".into(),
            redirect_url: Some("https://auth.example/start".into()),
            status: "initiated".into(),
        })
    }

    async fn delete_connected_account(&self, account_id: &str) -> Result<()> {
        self.record(format!("delete:{}", account_id));
        Ok(())
    }

    async fn refresh_connected_account(&self, account_id: &str) -> Result<()> {
        self.record(format!("refresh:{}", account_id));
        Ok(())
    }

    async fn set_connected_account_enabled(&self, account_id: &str, enabled: bool) -> Result<()> {
        self.record(format!("enabled:{}:{}", account_id, enabled));
        Ok(())
    }

    async fn list_auth_configs(&self, query: &AuthConfigQuery) -> Result<AuthConfigPage> {
        self.record("list_auth_configs".into());
        let items: Vec<AuthConfig> = self
            .auth_configs
            .iter()
            .filter(|c| {
                query
                    .toolkit_slug
                    .as_deref()
                    .map_or(true, |slug| c.toolkit == slug)
            })
            .cloned()
            .collect();
        Ok(AuthConfigPage {
            total_pages: 1,
            current_page: 1,
            total_items: items.len() as u64,
            next_cursor: None,
            items,
        })
    }

    async fn get_auth_config(&self, auth_config_id: &str) -> Result<AuthConfig> {
        self.record(format!("get_auth_config:{}", auth_config_id));
        self.auth_configs
            .iter()
            .find(|c| c.id == auth_config_id)
            .cloned()
            .ok_or_else(|| Error::Vendor {
                status: 404,
                message: "no such auth config".into(),
            })
    }

    async fn create_auth_config(&self, request: NewAuthConfig) -> Result<AuthConfig> {
        self.record(format!(
            "create_auth_config:{}:{}:{}",
            request.toolkit_slug, request.name, request.auth_scheme
        ));
        Ok(AuthConfig {
            id: "ac_new".into(),
            kind: "custom".into(),
            toolkit: request.toolkit_slug,
            name: request.name,
            status: "ENABLED".into(),
            auth_scheme: request.auth_scheme,
            ..Default::default()
        })
    }

    async fn update_auth_config(&self, auth_config_id: &str, update: AuthConfigUpdate) -> Result<()> {
        self.record(format!(
            "update_auth_config:{}:{}",
            auth_config_id,
            update.name.unwrap_or_default()
        ));
        Ok(())
    }

    async fn delete_auth_config(&self, auth_config_id: &str) -> Result<()> {
        self.record(format!("delete_auth_config:{}", auth_config_id));
        Ok(())
    }

    async fn execute_tool(&self, execution: ToolExecution) -> Result<ToolExecutionResult> {
        self.record(format!(
            "execute:{}:{}:{}",
            execution.user_id,
            execution.action,
            execution.connected_account_id.unwrap_or_default()
        ));
        if self.failing_tools.contains(&execution.action) {
            return Err(Error::Vendor {
                status: 400,
                message: "invalid arguments".into(),
            });
        }
        Ok(ToolExecutionResult {
            success: true,
            data: Some(serde_json::Value::Object(execution.arguments)),
            error: None,
        })
    }
}

pub fn toolkit(slug: &str, categories: &[&str]) -> Toolkit {
    Toolkit {
        slug: slug.into(),
        name: slug.into(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

pub fn account(id: &str, provider: &str, status: &str) -> ConnectedAccount {
    ConnectedAccount {
        account_id: id.into(),
        status: status.into(),
        provider: provider.into(),
        created_at: None,
        error: None,
    }
}

pub fn slack_and_github() -> ScriptedClient {
    ScriptedClient {
        available: true,
        toolkits: Some(vec![toolkit("slack", &[]), toolkit("github", &["Development"])]),
        accounts: Some(vec![
            account("a1", "slack", "active"),
            account("a2", "slack", "error"),
        ]),
        ..Default::default()
    }
}
