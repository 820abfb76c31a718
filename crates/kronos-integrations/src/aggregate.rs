//! Connection aggregation — bucket a user's connected accounts by provider.

use std::collections::HashMap;

use kronos_composio::ConnectedAccount;

use crate::parse::{parse_connection_status, parse_timestamp};
use crate::types::{IntegrationConnection, IntegrationStatus};

/// Group accounts by case-folded provider slug, keeping vendor order within
/// each bucket. Accounts without a provider cannot be joined to a toolkit
/// and are left out.
pub fn group_by_provider(accounts: &[ConnectedAccount]) -> HashMap<String, Vec<&ConnectedAccount>> {
    let mut buckets: HashMap<String, Vec<&ConnectedAccount>> = HashMap::new();
    for account in accounts {
        let provider = account.provider.trim();
        if provider.is_empty() {
            continue;
        }
        buckets
            .entry(provider.to_lowercase())
            .or_default()
            .push(account);
    }
    buckets
}

/// Convert a vendor account into a dashboard connection.
pub fn to_connection(account: &ConnectedAccount) -> IntegrationConnection {
    let status = parse_connection_status(&account.status);
    IntegrationConnection {
        account_id: account.account_id.clone(),
        status,
        created_at: parse_timestamp(account.created_at.as_deref()),
        last_used: None,
        error_message: match status {
            IntegrationStatus::Error => account.error.clone(),
            _ => None,
        },
    }
}
