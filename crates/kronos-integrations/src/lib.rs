//! Integration dashboard: aggregation, health, categories and stats.
//!
//! Builds a per-user view over the connector's toolkits and connected
//! accounts. Every dashboard read path degrades to empty or zero data
//! instead of failing; the action path (`IntegrationService::perform_action`)
//! and the management calls in `connector` return errors.

pub mod aggregate;
pub mod catalog;
pub mod connector;
pub mod filter;
pub mod health;
pub mod parse;
pub mod service;
pub mod system;
pub mod types;

pub use connector::ConnectorService;
pub use filter::{find_integration, SummaryFilter};
pub use service::IntegrationService;
pub use system::SystemHealth;
pub use types::*;
