//! Overall integration health rollup.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::IntegrationDashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Healthy,
    Warning,
    Critical,
}

impl SystemStatus {
    fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            SystemStatus::Healthy
        } else if percentage >= 60.0 {
            SystemStatus::Warning
        } else {
            SystemStatus::Critical
        }
    }
}

/// Connection health summary across all of a user's integrations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub composio_health: bool,
    pub total_connections: usize,
    pub healthy_connections: usize,
    pub failed_connections: usize,
    /// Healthy share in percent, one decimal. 100 with no connections.
    pub health_percentage: f64,
    pub status: SystemStatus,
    pub last_updated: DateTime<Utc>,
}

impl SystemHealth {
    pub fn from_dashboard(dashboard: &IntegrationDashboard) -> Self {
        let total = dashboard.total_connections;
        let healthy = dashboard.healthy_connections;

        let percentage = if total > 0 {
            healthy as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        let percentage = (percentage * 10.0).round() / 10.0;

        Self {
            composio_health: dashboard.composio_health,
            total_connections: total,
            healthy_connections: healthy,
            failed_connections: dashboard.failed_connections(),
            health_percentage: percentage,
            status: SystemStatus::from_percentage(percentage),
            last_updated: dashboard.last_updated,
        }
    }
}
