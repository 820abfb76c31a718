//! Health classification for a provider's connection set.

use crate::types::{ConnectionCounts, ConnectionHealth, IntegrationConnection};

/// Error share above which a provider is reported as `Error` rather than
/// `Warning`. Exactly half is still a warning.
pub const ERROR_RATIO_THRESHOLD: f64 = 0.5;

/// Classify a provider's connections.
pub fn classify(connections: &[IntegrationConnection]) -> ConnectionHealth {
    classify_counts(&ConnectionCounts::tally(connections))
}

pub fn classify_counts(counts: &ConnectionCounts) -> ConnectionHealth {
    if counts.total == 0 {
        return ConnectionHealth::Unknown;
    }

    if counts.error > 0 {
        let error_ratio = counts.error as f64 / counts.total as f64;
        if error_ratio > ERROR_RATIO_THRESHOLD {
            ConnectionHealth::Error
        } else {
            ConnectionHealth::Warning
        }
    } else if counts.active > 0 {
        ConnectionHealth::Healthy
    } else {
        ConnectionHealth::Warning
    }
}

/// Human-readable message for a verdict. Surfaced verbatim to API clients.
pub fn health_message(health: ConnectionHealth, counts: &ConnectionCounts) -> String {
    match health {
        ConnectionHealth::Healthy => format!("All {} connections are healthy", counts.active),
        ConnectionHealth::Warning if counts.active == 0 => {
            format!("No active connections out of {}", counts.total)
        }
        ConnectionHealth::Warning => {
            format!("{} active, {} with issues", counts.active, counts.error)
        }
        ConnectionHealth::Error => format!("{} connections have errors", counts.error),
        ConnectionHealth::Unknown => "No connections established".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntegrationStatus;
    use IntegrationStatus::*;

    fn connections(statuses: &[IntegrationStatus]) -> Vec<IntegrationConnection> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| IntegrationConnection {
                account_id: format!("a{}", i),
                status: *status,
                created_at: None,
                last_used: None,
                error_message: None,
            })
            .collect()
    }

    fn verdict(statuses: &[IntegrationStatus]) -> (ConnectionHealth, String) {
        let conns = connections(statuses);
        let counts = ConnectionCounts::tally(&conns);
        let health = classify(&conns);
        (health, health_message(health, &counts))
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(
            verdict(&[]),
            (ConnectionHealth::Unknown, "No connections established".into())
        );
    }

    #[test]
    fn test_minority_errors_warn() {
        assert_eq!(
            verdict(&[Active, Active, Error]),
            (ConnectionHealth::Warning, "2 active, 1 with issues".into())
        );
    }

    #[test]
    fn test_majority_errors_fail() {
        assert_eq!(
            verdict(&[Error, Error, Active]),
            (ConnectionHealth::Error, "2 connections have errors".into())
        );
    }

    #[test]
    fn test_exact_half_is_warning() {
        assert_eq!(verdict(&[Active, Error]).0, ConnectionHealth::Warning);
    }

    #[test]
    fn test_all_errors() {
        assert_eq!(
            verdict(&[Error]),
            (ConnectionHealth::Error, "1 connections have errors".into())
        );
    }

    #[test]
    fn test_inactive_only_warns() {
        assert_eq!(
            verdict(&[Inactive, Pending]),
            (ConnectionHealth::Warning, "No active connections out of 2".into())
        );
    }

    #[test]
    fn test_all_active_healthy() {
        assert_eq!(
            verdict(&[Active, Active]),
            (ConnectionHealth::Healthy, "All 2 connections are healthy".into())
        );
    }

    #[test]
    fn test_active_with_inactive_is_healthy() {
        // The healthy message counts only the active connections.
        assert_eq!(
            verdict(&[Active, Inactive]),
            (ConnectionHealth::Healthy, "All 1 connections are healthy".into())
        );
    }
}
