//! Import identifiers
//!
//! StrikeTracker resources live under an account, so an import id has to
//! carry the account hash next to the resource id:
//!
//! - `account_hash/ID` for origins, certificates and hosts
//! - `account_hash/host_hash/scope_id` for scope configurations
//!
//! Every segment must be non-empty and the segment count must match exactly.

use crate::error::{Error, Result};

/// Layout of two-part import ids
pub const TWO_PART_LAYOUT: &str = "account_hash/ID";

/// Layout of three-part import ids
pub const THREE_PART_LAYOUT: &str = "account_hash/host_hash/scope_id";

/// `account_hash/ID`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountScopedId {
    pub account_hash: String,
    pub id: String,
}

/// `account_hash/host_hash/scope_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConfigurationId {
    pub account_hash: String,
    pub host_hash: String,
    pub scope_id: u64,
}

fn split_exact<'a>(input: &'a str, count: usize, expected: &'static str) -> Result<Vec<&'a str>> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != count || parts.iter().any(|p| p.is_empty()) {
        return Err(Error::InvalidImportId {
            input: input.to_string(),
            expected,
        });
    }
    Ok(parts)
}

/// Parse `account_hash/ID`
pub fn parse_account_scoped(input: &str) -> Result<AccountScopedId> {
    let parts = split_exact(input, 2, TWO_PART_LAYOUT)?;
    Ok(AccountScopedId {
        account_hash: parts[0].to_string(),
        id: parts[1].to_string(),
    })
}

/// Parse `account_hash/host_hash/scope_id`
pub fn parse_scope_configuration(input: &str) -> Result<ScopeConfigurationId> {
    let parts = split_exact(input, 3, THREE_PART_LAYOUT)?;
    let scope_id = parts[2].parse().map_err(|_| Error::InvalidImportId {
        input: input.to_string(),
        expected: THREE_PART_LAYOUT,
    })?;
    Ok(ScopeConfigurationId {
        account_hash: parts[0].to_string(),
        host_hash: parts[1].to_string(),
        scope_id,
    })
}

/// Parse a numeric resource id held in state
pub fn parse_numeric(id: &str, kind: &str) -> Result<u64> {
    id.parse().map_err(|_| {
        Error::invalid_input(format!("{} ID {:?} is an invalid {} ID", kind, id, kind))
    })
}
