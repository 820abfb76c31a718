//! Kronos Composio — connector client for the Composio integration platform.
//!
//! `ConnectorClient` is the seam the dashboard code depends on.
//! `ComposioClient` implements it over the Composio v3 REST API. Vendor
//! JSON is parsed once in `wire` and handed out as the typed records in
//! `types`; nothing downstream touches raw vendor payloads.

pub mod client;
pub mod types;
pub mod wire;

pub use client::{ComposioClient, ConnectorClient};
pub use types::*;
