//! Normalisation of vendor status strings and timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::types::IntegrationStatus;

/// Formats tried in order. `%.f` also accepts a missing fraction.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
];

/// Map a vendor status string to an `IntegrationStatus`.
///
/// Unrecognised or empty strings are treated as inactive.
pub fn parse_connection_status(status: &str) -> IntegrationStatus {
    match status.trim().to_lowercase().as_str() {
        "active" | "enabled" | "connected" => IntegrationStatus::Active,
        "inactive" | "disabled" | "disconnected" => IntegrationStatus::Inactive,
        "pending" | "initiated" => IntegrationStatus::Pending,
        "error" | "failed" => IntegrationStatus::Error,
        _ => IntegrationStatus::Inactive,
    }
}

/// Parse a vendor timestamp, interpreted as UTC. Returns `None` for absent
/// or unparseable input.
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
