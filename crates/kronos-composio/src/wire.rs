//! Composio response schema.
//!
//! Every field is optional on the wire, and an explicit `null` reads the
//! same as an absent field. Defaults are assigned here and the records are
//! converted into the typed values in `crate::types`. List responses are
//! decoded record by record; a malformed record is logged and skipped.

use serde::de::{DeserializeOwned, Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::types::{
    AuthConfig, AuthConfigPage, ConnectedAccount, ConnectionRequest, ToolAction,
    ToolExecutionResult, Toolkit,
};

/// Read `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A category is sent either as a plain name or as `{ name, slug }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryWire {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        slug: Option<String>,
    },
    Other(IgnoredAny),
}

impl CategoryWire {
    fn into_name(self) -> Option<String> {
        let name = match self {
            CategoryWire::Name(name) => Some(name),
            CategoryWire::Object { name, slug } => name.or(slug),
            CategoryWire::Other(_) => None,
        };
        name.filter(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolkitMetaWire {
    pub description: Option<String>,
    pub logo: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolkitWire {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<CategoryWire>,
    #[serde(deserialize_with = "null_as_default")]
    pub auth_schemes: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub composio_managed_auth_schemes: Vec<String>,
    pub meta: Option<ToolkitMetaWire>,
}

impl From<ToolkitWire> for Toolkit {
    fn from(wire: ToolkitWire) -> Self {
        let meta = wire.meta.unwrap_or_default();

        let categories = if wire.categories.is_empty() {
            meta.categories
        } else {
            wire.categories
        };

        let mut auth_schemes = wire.auth_schemes;
        for scheme in wire.composio_managed_auth_schemes {
            if !auth_schemes.contains(&scheme) {
                auth_schemes.push(scheme);
            }
        }

        Toolkit {
            slug: wire.slug.unwrap_or_default(),
            name: wire.name.unwrap_or_default(),
            description: wire.description.or(meta.description).unwrap_or_default(),
            logo: wire.logo.or(meta.logo).unwrap_or_default(),
            categories: categories
                .into_iter()
                .filter_map(CategoryWire::into_name)
                .collect(),
            auth_schemes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolkitRefWire {
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectedAccountWire {
    #[serde(alias = "account_id")]
    pub id: Option<String>,
    pub status: Option<String>,
    pub toolkit: Option<ToolkitRefWire>,
    #[serde(alias = "appName")]
    pub app_name: Option<String>,
    pub provider: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(alias = "statusReason")]
    pub status_reason: Option<String>,
    pub error: Option<String>,
}

impl From<ConnectedAccountWire> for ConnectedAccount {
    fn from(wire: ConnectedAccountWire) -> Self {
        let provider = wire
            .toolkit
            .and_then(|t| t.slug)
            .or(wire.app_name)
            .or(wire.provider)
            .unwrap_or_default();

        ConnectedAccount {
            account_id: wire.id.unwrap_or_default(),
            status: wire.status.unwrap_or_default(),
            provider,
            created_at: wire.created_at.filter(|c| !c.is_empty()),
            error: wire.status_reason.or(wire.error),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolActionWire {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub toolkit: Option<ToolkitRefWire>,
    #[serde(alias = "parameters")]
    pub input_parameters: Option<Value>,
}

impl From<ToolActionWire> for ToolAction {
    fn from(wire: ToolActionWire) -> Self {
        ToolAction {
            slug: wire.slug.or_else(|| wire.name.clone()).unwrap_or_default(),
            name: wire.name.unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
            toolkit: wire.toolkit.and_then(|t| t.slug).unwrap_or_default(),
            input_parameters: wire.input_parameters.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfigWire {
    pub id: Option<String>,
    pub uuid: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub toolkit: Option<ToolkitRefWire>,
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "noOfConnections")]
    pub no_of_connections: Option<u64>,
    #[serde(alias = "authScheme")]
    pub auth_scheme: Option<String>,
    #[serde(alias = "isComposioManaged")]
    pub is_composio_managed: Option<bool>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(alias = "lastUpdatedAt")]
    pub last_updated_at: Option<String>,
}

impl From<AuthConfigWire> for AuthConfig {
    fn from(wire: AuthConfigWire) -> Self {
        let is_composio_managed = wire.is_composio_managed.unwrap_or(false);
        let default_kind = if is_composio_managed { "default" } else { "custom" };
        AuthConfig {
            id: wire.id.unwrap_or_default(),
            uuid: wire.uuid.unwrap_or_default(),
            kind: wire.kind.unwrap_or_else(|| default_kind.to_string()),
            toolkit: wire.toolkit.and_then(|t| t.slug).unwrap_or_default(),
            name: wire.name.unwrap_or_default(),
            status: wire.status.unwrap_or_else(|| "ENABLED".into()),
            no_of_connections: wire.no_of_connections.unwrap_or(0),
            auth_scheme: wire.auth_scheme.unwrap_or_default(),
            is_composio_managed,
            created_at: wire.created_at.filter(|c| !c.is_empty()),
            last_updated_at: wire.last_updated_at.filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfigPageWire {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Value>,
    pub total_pages: Option<u64>,
    pub current_page: Option<u64>,
    pub total_items: Option<u64>,
    pub next_cursor: Option<String>,
}

impl From<AuthConfigPageWire> for AuthConfigPage {
    fn from(wire: AuthConfigPageWire) -> Self {
        let items: Vec<AuthConfig> = parse_records::<AuthConfigWire, _>(wire.items);
        AuthConfigPage {
            total_pages: wire.total_pages.unwrap_or(1),
            current_page: wire.current_page.unwrap_or(1),
            total_items: wire.total_items.unwrap_or(items.len() as u64),
            next_cursor: wire.next_cursor.filter(|c| !c.is_empty()),
            items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionRequestWire {
    pub id: Option<String>,
    #[serde(alias = "redirectUrl", alias = "redirect_uri")]
    pub redirect_url: Option<String>,
    #[serde(alias = "connectionStatus")]
    pub status: Option<String>,
}

impl From<ConnectionRequestWire> for ConnectionRequest {
    fn from(wire: ConnectionRequestWire) -> Self {
        ConnectionRequest {
            connection_id: wire.id.unwrap_or_default(),
            redirect_url: wire.redirect_url,
            status: wire.status.unwrap_or_else(|| "initiated".into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolExecutionWire {
    pub data: Option<Value>,
    pub error: Option<String>,
    #[serde(alias = "success")]
    pub successful: Option<bool>,
}

impl From<ToolExecutionWire> for ToolExecutionResult {
    fn from(wire: ToolExecutionWire) -> Self {
        let error = wire.error.filter(|e| !e.is_empty());
        ToolExecutionResult {
            success: wire.successful.unwrap_or(error.is_none()),
            data: wire.data.filter(|d| !d.is_null()),
            error,
        }
    }
}

/// Decode a single record, unwrapping `{ "<key>": {...} }` envelopes.
pub fn parse_record<W, T>(value: Value, envelope: &str) -> serde_json::Result<T>
where
    W: DeserializeOwned,
    T: From<W>,
{
    let value = match value {
        Value::Object(mut map) if map.get(envelope).is_some_and(Value::is_object) => {
            map.remove(envelope).unwrap_or_default()
        }
        other => other,
    };
    Ok(T::from(serde_json::from_value::<W>(value)?))
}

/// Decode a list response: `{ "items": [...] }` or a bare array.
///
/// Fails only when the response itself is not a list. Records that do not
/// decode are skipped.
pub fn parse_listing<W, T>(value: Value) -> serde_json::Result<Vec<T>>
where
    W: DeserializeOwned,
    T: From<W>,
{
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(serde_json::Error::custom(
                    "list response `items` is not an array",
                ))
            }
        },
        _ => {
            return Err(serde_json::Error::custom(
                "list response is neither an array nor an object",
            ))
        }
    };
    Ok(parse_records::<W, T>(items))
}

/// Decode records one at a time, logging and dropping the ones that fail.
pub fn parse_records<W, T>(items: Vec<Value>) -> Vec<T>
where
    W: DeserializeOwned,
    T: From<W>,
{
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<W>(item) {
            Ok(wire) => records.push(T::from(wire)),
            Err(e) => warn!(index, "Skipping malformed vendor record: {}", e),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toolkit_v3_shape() {
        let value = json!({
            "items": [{
                "slug": "github",
                "name": "GitHub",
                "meta": {
                    "description": "Code hosting",
                    "logo": "https://logos/github.png",
                    "categories": [{"name": "Developer Tools", "slug": "developer-tools"}]
                },
                "auth_schemes": ["OAUTH2"],
                "composio_managed_auth_schemes": ["OAUTH2", "API_KEY"]
            }],
            "next_cursor": null
        });

        let toolkits: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(value).unwrap();
        assert_eq!(toolkits.len(), 1);
        let github = &toolkits[0];
        assert_eq!(github.slug, "github");
        assert_eq!(github.description, "Code hosting");
        assert_eq!(github.logo, "https://logos/github.png");
        assert_eq!(github.categories, vec!["Developer Tools"]);
        assert_eq!(github.auth_schemes, vec!["OAUTH2", "API_KEY"]);
    }

    #[test]
    fn test_toolkit_missing_fields_default() {
        let value = json!([{ "slug": "slack", "categories": ["Chat", ""] }, {}]);
        let toolkits: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(value).unwrap();
        assert_eq!(toolkits[0].slug, "slack");
        assert_eq!(toolkits[0].categories, vec!["Chat"]);
        assert_eq!(toolkits[1], Toolkit::default());
    }

    #[test]
    fn test_toolkit_null_lists_read_as_empty() {
        let value = json!({
            "items": [
                { "slug": "slack", "categories": [] },
                { "slug": "github", "categories": null, "auth_schemes": null,
                  "composio_managed_auth_schemes": null, "meta": { "categories": null } },
                { "slug": "notion", "categories": ["Productivity", null, 7] }
            ]
        });

        let toolkits: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(value).unwrap();
        assert_eq!(toolkits.len(), 3);
        assert_eq!(toolkits[1].slug, "github");
        assert!(toolkits[1].categories.is_empty());
        assert!(toolkits[1].auth_schemes.is_empty());
        assert_eq!(toolkits[2].categories, vec!["Productivity"]);
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let value = json!({
            "items": [
                { "slug": "slack" },
                { "slug": ["not", "a", "string"] },
                "garbage",
                { "slug": "github" }
            ]
        });

        let toolkits: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(value).unwrap();
        let slugs: Vec<&str> = toolkits.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["slack", "github"]);
    }

    #[test]
    fn test_listing_shapes() {
        let empty: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(json!({ "items": null })).unwrap();
        assert!(empty.is_empty());
        let empty: Vec<Toolkit> = parse_listing::<ToolkitWire, _>(Value::Null).unwrap();
        assert!(empty.is_empty());

        assert!(parse_listing::<ToolkitWire, Toolkit>(json!("nope")).is_err());
        assert!(parse_listing::<ToolkitWire, Toolkit>(json!({ "items": 3 })).is_err());
    }

    #[test]
    fn test_connected_account_v3_shape() {
        let value = json!({
            "items": [{
                "id": "ca_1",
                "status": "ACTIVE",
                "toolkit": {"slug": "slack"},
                "created_at": "2024-05-01T10:00:00.000Z"
            }, {
                "id": "ca_2",
                "status": "FAILED",
                "toolkit": {"slug": "gmail"},
                "status_reason": "token revoked"
            }]
        });

        let accounts: Vec<ConnectedAccount> =
            parse_listing::<ConnectedAccountWire, _>(value).unwrap();
        assert_eq!(accounts[0].account_id, "ca_1");
        assert_eq!(accounts[0].provider, "slack");
        assert_eq!(accounts[0].created_at.as_deref(), Some("2024-05-01T10:00:00.000Z"));
        assert_eq!(accounts[1].error.as_deref(), Some("token revoked"));
    }

    #[test]
    fn test_connected_account_legacy_shape() {
        let value = json!([{ "id": "a1", "status": "connected", "appName": "notion", "createdAt": "" }]);
        let accounts: Vec<ConnectedAccount> =
            parse_listing::<ConnectedAccountWire, _>(value).unwrap();
        assert_eq!(accounts[0].provider, "notion");
        assert!(accounts[0].created_at.is_none());
    }

    #[test]
    fn test_connected_account_without_provider() {
        let value = json!({ "items": [{ "id": "orphan", "status": "active" }] });
        let accounts: Vec<ConnectedAccount> =
            parse_listing::<ConnectedAccountWire, _>(value).unwrap();
        assert_eq!(accounts[0].provider, "");
    }

    #[test]
    fn test_connection_request_aliases() {
        let wire: ConnectionRequestWire =
            serde_json::from_value(json!({ "id": "cr_9", "redirect_uri": "https://auth" })).unwrap();
        let request = ConnectionRequest::from(wire);
        assert_eq!(request.connection_id, "cr_9");
        assert_eq!(request.redirect_url.as_deref(), Some("https://auth"));
        assert_eq!(request.status, "initiated");
    }

    #[test]
    fn test_auth_config_page() {
        let value = json!({
            "items": [{
                "id": "ac_1",
                "uuid": "6b1c",
                "type": "custom",
                "toolkit": { "slug": "github", "logo": "https://logos/github.png" },
                "name": "GitHub OAuth",
                "status": "ENABLED",
                "no_of_connections": 3,
                "auth_scheme": "OAUTH2",
                "is_composio_managed": false,
                "created_at": "2024-05-01T10:00:00.000Z",
                "last_updated_at": null
            }, 42],
            "total_pages": 1,
            "current_page": 1,
            "total_items": 1,
            "next_cursor": null
        });

        let page = AuthConfigPage::from(serde_json::from_value::<AuthConfigPageWire>(value).unwrap());
        assert_eq!(page.items.len(), 1);
        let config = &page.items[0];
        assert_eq!(config.id, "ac_1");
        assert_eq!(config.toolkit, "github");
        assert_eq!(config.no_of_connections, 3);
        assert!(config.last_updated_at.is_none());
        assert_eq!(page.total_items, 1);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_auth_config_create_envelope() {
        let value = json!({
            "toolkit": { "slug": "github" },
            "auth_config": { "id": "ac_9", "auth_scheme": "OAUTH2", "is_composio_managed": true }
        });
        let config: AuthConfig = parse_record::<AuthConfigWire, _>(value, "auth_config").unwrap();
        assert_eq!(config.id, "ac_9");
        assert_eq!(config.kind, "default");
        assert_eq!(config.status, "ENABLED");

        let bare = json!({ "id": "ac_2", "name": "Mine" });
        let config: AuthConfig = parse_record::<AuthConfigWire, _>(bare, "auth_config").unwrap();
        assert_eq!(config.id, "ac_2");
        assert_eq!(config.kind, "custom");
    }

    #[test]
    fn test_tool_execution_outcome() {
        let ok: ToolExecutionResult = serde_json::from_value::<ToolExecutionWire>(
            json!({ "data": { "issue": 12 }, "error": null, "successful": true }),
        )
        .unwrap()
        .into();
        assert!(ok.success);
        assert_eq!(ok.data, Some(json!({ "issue": 12 })));

        let failed: ToolExecutionResult =
            serde_json::from_value::<ToolExecutionWire>(json!({ "error": "rate limited" }))
                .unwrap()
                .into();
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("rate limited"));
    }
}
