//! Connector client trait and the Composio REST implementation.

use async_trait::async_trait;
use kronos_core::{ComposioConfig, Error, Result};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::types::{
    AuthConfig, AuthConfigPage, AuthConfigQuery, AuthConfigUpdate, ConnectedAccount,
    ConnectionRequest, InitiateConnection, NewAuthConfig, ToolAction, ToolExecution,
    ToolExecutionResult, Toolkit,
};
use crate::wire::{
    parse_listing, parse_record, AuthConfigPageWire, AuthConfigWire, ConnectedAccountWire,
    ConnectionRequestWire, ToolActionWire, ToolExecutionWire, ToolkitWire,
};

/// Operations the dashboard, action and connector endpoints need from the
/// connector.
#[async_trait]
pub trait ConnectorClient: Send + Sync {
    /// Whether the connector is configured and usable.
    fn is_available(&self) -> bool;

    /// List toolkits, optionally filtered by a search term.
    async fn list_toolkits(&self, search: Option<&str>, limit: usize) -> Result<Vec<Toolkit>>;

    /// List every connected account belonging to a user.
    async fn list_connected_accounts(&self, user_id: &str) -> Result<Vec<ConnectedAccount>>;

    async fn get_connected_account(&self, account_id: &str) -> Result<ConnectedAccount>;

    /// List up to `limit` actions exposed by a toolkit.
    async fn list_toolkit_actions(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolAction>>;

    /// Start an OAuth connection for a user.
    async fn initiate_connection(&self, request: InitiateConnection) -> Result<ConnectionRequest>;

    async fn delete_connected_account(&self, account_id: &str) -> Result<()>;

    async fn refresh_connected_account(&self, account_id: &str) -> Result<()>;

    /// Enable or disable a connected account.
    async fn set_connected_account_enabled(&self, account_id: &str, enabled: bool) -> Result<()>;

    async fn list_auth_configs(&self, query: &AuthConfigQuery) -> Result<AuthConfigPage>;

    async fn get_auth_config(&self, auth_config_id: &str) -> Result<AuthConfig>;

    async fn create_auth_config(&self, request: NewAuthConfig) -> Result<AuthConfig>;

    async fn update_auth_config(&self, auth_config_id: &str, update: AuthConfigUpdate) -> Result<()>;

    async fn delete_auth_config(&self, auth_config_id: &str) -> Result<()>;

    /// Run an action for a user. A run the vendor reports as failed is an
    /// `Ok` result with `success == false`.
    async fn execute_tool(&self, execution: ToolExecution) -> Result<ToolExecutionResult>;
}

/// Composio v3 REST client.
pub struct ComposioClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ComposioClient {
    /// Build a client from configuration.
    ///
    /// An unconfigured API key still yields a client; it reports itself
    /// unavailable and every call fails with `Error::Unavailable`.
    pub fn new(config: &ComposioConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid COMPOSIO_BASE_URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "COMPOSIO_BASE_URL '{}' cannot carry a path",
                base_url
            )));
        }

        let http = Client::builder().timeout(config.timeout()).build()?;

        if config.is_configured() {
            info!("Composio client configured for {}", base_url);
        } else {
            warn!("Composio API key not configured. Integration features are disabled.");
        }

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.trim().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build `{base}/api/v3/<segments...>` with every segment
    /// percent-encoded, so caller-supplied ids stay inside one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.trim().is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::Validation(format!("Invalid identifier: '{}'", bad)));
        }

        let mut url = Url::parse(&self.url(""))
            .map_err(|e| Error::Config(format!("Invalid Composio base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("Composio base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::Unavailable("Composio client not configured".into()))
        }
    }

    /// Send a request with credentials and map non-2xx responses to errors.
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        self.ensure_available()?;

        let response = request.header("x-api-key", &self.api_key).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Vendor {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn first_auth_config(&self, toolkit: &str) -> Result<String> {
        let value = self
            .send(
                self.http
                    .get(self.url("auth_configs"))
                    .query(&[("toolkit_slug", toolkit)]),
            )
            .await?;

        parse_listing::<AuthConfigWire, AuthConfig>(value)?
            .into_iter()
            .map(|c| c.id)
            .find(|id| !id.is_empty())
            .ok_or_else(|| Error::NotFound(format!("No auth config registered for {}", toolkit)))
    }
}

#[async_trait]
impl ConnectorClient for ComposioClient {
    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn list_toolkits(&self, search: Option<&str>, limit: usize) -> Result<Vec<Toolkit>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }

        let value = self
            .send(self.http.get(self.url("toolkits")).query(&query))
            .await?;
        let toolkits: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(value)?;
        debug!("Fetched {} toolkits", toolkits.len());
        Ok(toolkits)
    }

    async fn list_connected_accounts(&self, user_id: &str) -> Result<Vec<ConnectedAccount>> {
        let value = self
            .send(
                self.http
                    .get(self.url("connected_accounts"))
                    .query(&[("user_ids", user_id)]),
            )
            .await?;
        let accounts: Vec<ConnectedAccount> = parse_listing::<ConnectedAccountWire, _>(value)?;
        debug!(user_id, "Fetched {} connected accounts", accounts.len());
        Ok(accounts)
    }

    async fn get_connected_account(&self, account_id: &str) -> Result<ConnectedAccount> {
        let url = self.endpoint(&["connected_accounts", account_id])?;
        let value = self.send(self.http.get(url)).await?;
        Ok(parse_record::<ConnectedAccountWire, _>(value, "connected_account")?)
    }

    async fn list_toolkit_actions(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolAction>> {
        let value = self
            .send(self.http.get(self.url("tools")).query(&[
                ("toolkit_slug", toolkit.to_string()),
                ("limit", limit.to_string()),
            ]))
            .await?;
        let mut actions: Vec<ToolAction> = parse_listing::<ToolActionWire, _>(value)?;
        actions.truncate(limit);
        Ok(actions)
    }

    async fn initiate_connection(&self, request: InitiateConnection) -> Result<ConnectionRequest> {
        let auth_config_id = match request.auth_config_id {
            Some(id) if !id.is_empty() => id,
            _ => self.first_auth_config(&request.toolkit).await?,
        };

        let mut connection = json!({ "user_id": request.user_id });
        if let Some(url) = request.redirect_url.filter(|u| !u.is_empty()) {
            connection["callback_url"] = json!(url);
        }

        let value = self
            .send(self.http.post(self.url("connected_accounts")).json(&json!({
                "auth_config": { "id": auth_config_id },
                "connection": connection,
            })))
            .await?;

        let wire: ConnectionRequestWire = serde_json::from_value(value)?;
        let created = ConnectionRequest::from(wire);
        info!(
            toolkit = %request.toolkit,
            connection_id = %created.connection_id,
            "Connection initiated"
        );
        Ok(created)
    }

    async fn delete_connected_account(&self, account_id: &str) -> Result<()> {
        let url = self.endpoint(&["connected_accounts", account_id])?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    async fn refresh_connected_account(&self, account_id: &str) -> Result<()> {
        let url = self.endpoint(&["connected_accounts", account_id, "refresh"])?;
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    async fn set_connected_account_enabled(&self, account_id: &str, enabled: bool) -> Result<()> {
        let url = self.endpoint(&["connected_accounts", account_id, "status"])?;
        self.send(self.http.patch(url).json(&json!({ "enabled": enabled })))
            .await?;
        Ok(())
    }

    async fn list_auth_configs(&self, query: &AuthConfigQuery) -> Result<AuthConfigPage> {
        let mut params = vec![("show_disabled", query.show_disabled.to_string())];
        if let Some(managed) = query.is_composio_managed {
            params.push(("is_composio_managed", managed.to_string()));
        }
        if let Some(slug) = query.toolkit_slug.as_deref().filter(|s| !s.is_empty()) {
            params.push(("toolkit_slug", slug.to_string()));
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = query.cursor.as_deref().filter(|s| !s.is_empty()) {
            params.push(("cursor", cursor.to_string()));
        }

        let value = self
            .send(self.http.get(self.url("auth_configs")).query(&params))
            .await?;
        let wire: AuthConfigPageWire = match value {
            Value::Array(items) => AuthConfigPageWire {
                items,
                ..Default::default()
            },
            other => serde_json::from_value(other)?,
        };
        Ok(AuthConfigPage::from(wire))
    }

    async fn get_auth_config(&self, auth_config_id: &str) -> Result<AuthConfig> {
        let url = self.endpoint(&["auth_configs", auth_config_id])?;
        let value = self.send(self.http.get(url)).await?;
        Ok(parse_record::<AuthConfigWire, _>(value, "auth_config")?)
    }

    async fn create_auth_config(&self, request: NewAuthConfig) -> Result<AuthConfig> {
        let mut auth_config = Map::new();
        auth_config.insert("type".into(), json!("use_custom_auth"));
        auth_config.insert("name".into(), json!(request.name));
        auth_config.insert("authScheme".into(), json!(request.auth_scheme));
        if let Some(credentials) = request.credentials {
            auth_config.insert("credentials".into(), Value::Object(credentials));
        }
        if let Some(proxy) = request.proxy_config {
            auth_config.insert("proxy_config".into(), Value::Object(proxy));
        }

        let value = self
            .send(self.http.post(self.url("auth_configs")).json(&json!({
                "toolkit": { "slug": request.toolkit_slug },
                "auth_config": auth_config,
            })))
            .await?;

        let mut created: AuthConfig = parse_record::<AuthConfigWire, _>(value, "auth_config")?;
        if created.toolkit.is_empty() {
            created.toolkit = request.toolkit_slug;
        }
        if created.name.is_empty() {
            created.name = request.name;
        }
        if created.auth_scheme.is_empty() {
            created.auth_scheme = request.auth_scheme;
        }
        info!(auth_config_id = %created.id, toolkit = %created.toolkit, "Auth config created");
        Ok(created)
    }

    async fn update_auth_config(&self, auth_config_id: &str, update: AuthConfigUpdate) -> Result<()> {
        let mut body = Map::new();
        body.insert("type".into(), json!("custom"));
        if let Some(name) = update.name {
            body.insert("name".into(), json!(name));
        }
        if let Some(credentials) = update.credentials {
            body.insert("credentials".into(), Value::Object(credentials));
        }
        if let Some(proxy) = update.proxy_config {
            body.insert("proxy_config".into(), Value::Object(proxy));
        }

        let url = self.endpoint(&["auth_configs", auth_config_id])?;
        self.send(self.http.patch(url).json(&body)).await?;
        info!(auth_config_id, "Auth config updated");
        Ok(())
    }

    async fn delete_auth_config(&self, auth_config_id: &str) -> Result<()> {
        let url = self.endpoint(&["auth_configs", auth_config_id])?;
        self.send(self.http.delete(url)).await?;
        info!(auth_config_id, "Auth config deleted");
        Ok(())
    }

    async fn execute_tool(&self, execution: ToolExecution) -> Result<ToolExecutionResult> {
        let mut body = json!({
            "user_id": execution.user_id,
            "arguments": execution.arguments,
        });
        if let Some(account_id) = execution.connected_account_id.filter(|id| !id.is_empty()) {
            body["connected_account_id"] = json!(account_id);
        }

        let url = self.endpoint(&["tools", "execute", &execution.action])?;
        let value = self.send(self.http.post(url).json(&body)).await?;
        let wire: ToolExecutionWire = if value.is_null() {
            ToolExecutionWire::default()
        } else {
            serde_json::from_value(value)?
        };
        let result = ToolExecutionResult::from(wire);
        debug!(action = %execution.action, success = result.success, "Tool executed");
        Ok(result)
    }
}
