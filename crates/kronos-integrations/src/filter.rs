//! Filtering and lookup over an assembled dashboard.

use serde::Deserialize;

use crate::types::{IntegrationDashboard, IntegrationSummary};

/// Query filters for the integration summary list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryFilter {
    /// Keep integrations in this category (case-insensitive).
    #[serde(default)]
    pub category: Option<String>,
    /// Keep only integrations with at least one connection.
    #[serde(default)]
    pub connected_only: bool,
    /// Substring match on provider, display name or description.
    #[serde(default)]
    pub search: Option<String>,
}

impl SummaryFilter {
    pub fn apply(&self, integrations: &[IntegrationSummary]) -> Vec<IntegrationSummary> {
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        integrations
            .iter()
            .filter(|i| {
                category.as_ref().map_or(true, |wanted| {
                    i.categories.iter().any(|c| c.to_lowercase() == *wanted)
                })
            })
            .filter(|i| !self.connected_only || i.total_connections > 0)
            .filter(|i| {
                search.as_ref().map_or(true, |needle| {
                    i.provider.to_lowercase().contains(needle.as_str())
                        || i.display_name.to_lowercase().contains(needle.as_str())
                        || i
                            .description
                            .as_deref()
                            .unwrap_or("")
                            .to_lowercase()
                            .contains(needle.as_str())
                })
            })
            .cloned()
            .collect()
    }
}

/// Find an integration by provider slug, ignoring case.
pub fn find_integration<'a>(
    dashboard: &'a IntegrationDashboard,
    provider: &str,
) -> Option<&'a IntegrationSummary> {
    let provider = provider.to_lowercase();
    dashboard
        .integrations
        .iter()
        .find(|i| i.provider.to_lowercase() == provider)
}
