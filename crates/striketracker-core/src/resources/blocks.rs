//! Nested blocks of the configuration resources
//!
//! Each rule block has a state form (snake_case, schema defaults) and maps
//! onto exactly one wire type in [`crate::models`] in each direction. The
//! weight is not part of these blocks; [`crate::codec::Weighted`] carries it.

use serde::{Deserialize, Serialize};

use crate::codec::RuleFamily;
use crate::error::{Error, Result};
use crate::models::{
    AccessLogs, CacheControl, CacheKeyModification, OriginPull, OriginPullCacheExtension,
    OriginPullHost, OriginPullLogs, OriginPullPolicy, OriginPullProtocol, RequestModification,
    ResponseModification, StaticHeader, CDS_PLATFORM,
};

/// Accepted values of `expire_policy`
pub const EXPIRE_POLICIES: [&str; 5] = [
    "CACHE_CONTROL",
    "INGEST",
    "LAST_MODIFY",
    "NEVER_EXPIRE",
    "DO_NOT_CACHE",
];

/// Accepted values of `flow_control`
pub const FLOW_CONTROLS: [&str; 2] = ["next", "break"];

/// Accepted values of `origin_pull_protocol`
pub const PULL_PROTOCOLS: [&str; 3] = ["http", "https", "match"];

/// Accepted values of `redirect_action`
pub const REDIRECT_ACTIONS: [&str; 2] = ["proxy", "follow"];

fn wildcard() -> String {
    "*".to_string()
}

fn one_of(family: RuleFamily, index: usize, key: &str, value: &str, valid: &[&str]) -> Result<()> {
    if valid.contains(&value) {
        return Ok(());
    }
    Err(Error::config(format!(
        "{}[{}]: {:?} must be one of ({}), got {:?}",
        family,
        index,
        key,
        valid.join(", "),
        value
    )))
}

/// Identity of a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeBlock {
    /// Assigned by the API
    pub id: Option<u64>,
    pub name: String,
    pub platform: String,
    pub path: String,
}

impl Default for ScopeBlock {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            platform: CDS_PLATFORM.to_string(),
            path: "/".to_string(),
        }
    }
}

/// Origins a scope pulls from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginBlock {
    pub primary: Option<u64>,
    pub secondary: Option<u64>,
    pub path: String,
    pub origin_pull_protocol: String,
    pub redirect_action: String,
}

impl OriginBlock {
    /// Lower-case the enumerated fields and check them
    pub fn normalize(&mut self) -> Result<()> {
        self.origin_pull_protocol = self.origin_pull_protocol.to_lowercase();
        self.redirect_action = self.redirect_action.to_lowercase();

        if !PULL_PROTOCOLS.contains(&self.origin_pull_protocol.as_str()) {
            return Err(Error::config(format!(
                "origin.origin_pull_protocol must be one of (http, https, or match), got {:?}",
                self.origin_pull_protocol
            )));
        }
        if !REDIRECT_ACTIONS.contains(&self.redirect_action.as_str()) {
            return Err(Error::config(format!(
                "origin.redirect_action must be one of (proxy, follow), got {:?}",
                self.redirect_action
            )));
        }
        Ok(())
    }

    /// Split into the three wire blocks that carry origin settings
    pub fn to_wire(&self) -> (OriginPullHost, OriginPullProtocol, OriginPull) {
        (
            OriginPullHost {
                primary: self.primary,
                secondary: self.secondary,
                path: self.path.clone(),
            },
            OriginPullProtocol {
                protocol: self.origin_pull_protocol.clone(),
            },
            OriginPull {
                redirect_action: self.redirect_action.clone(),
            },
        )
    }

    /// Rebuild from the wire blocks; absent when the API returned none of them
    pub fn from_wire(
        host: Option<OriginPullHost>,
        protocol: Option<OriginPullProtocol>,
        pull: Option<OriginPull>,
    ) -> Option<Self> {
        if host.is_none() && protocol.is_none() && pull.is_none() {
            return None;
        }
        let host = host.unwrap_or_default();
        Some(Self {
            primary: host.primary,
            secondary: host.secondary,
            path: host.path,
            origin_pull_protocol: protocol.map(|p| p.protocol.to_lowercase()).unwrap_or_default(),
            redirect_action: pull.map(|p| p.redirect_action.to_lowercase()).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheExtensionBlock {
    pub enabled: bool,
    pub expired_cache_extension: Option<i64>,
    pub origin_unreachable_cache_extension: Option<i64>,
}

impl From<CacheExtensionBlock> for OriginPullCacheExtension {
    fn from(block: CacheExtensionBlock) -> Self {
        Self {
            enabled: block.enabled,
            expired_cache_extension: block.expired_cache_extension,
            origin_unreachable_cache_extension: block.origin_unreachable_cache_extension,
        }
    }
}

impl From<OriginPullCacheExtension> for CacheExtensionBlock {
    fn from(wire: OriginPullCacheExtension) -> Self {
        Self {
            enabled: wire.enabled,
            expired_cache_extension: wire.expired_cache_extension,
            origin_unreachable_cache_extension: wire.origin_unreachable_cache_extension,
        }
    }
}

/// Cache key normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheKeysBlock {
    pub normalize_key_path_to_lower_case: bool,
}

impl From<CacheKeysBlock> for CacheKeyModification {
    fn from(block: CacheKeysBlock) -> Self {
        Self {
            normalize_key_path_to_lower_case: block.normalize_key_path_to_lower_case,
        }
    }
}

impl From<CacheKeyModification> for CacheKeysBlock {
    fn from(wire: CacheKeyModification) -> Self {
        Self {
            normalize_key_path_to_lower_case: wire.normalize_key_path_to_lower_case,
        }
    }
}

/// Access and origin pull logging switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsBlock {
    pub access_logs: bool,
    pub origin_pull_logs: bool,
}

impl LogsBlock {
    pub fn to_wire(&self) -> (AccessLogs, OriginPullLogs) {
        (
            AccessLogs {
                enabled: self.access_logs,
            },
            OriginPullLogs {
                enabled: self.origin_pull_logs,
            },
        )
    }

    pub fn from_wire(access: Option<AccessLogs>, pull: Option<OriginPullLogs>) -> Option<Self> {
        if access.is_none() && pull.is_none() {
            return None;
        }
        Some(Self {
            access_logs: access.map(|a| a.enabled).unwrap_or_default(),
            origin_pull_logs: pull.map(|p| p.enabled).unwrap_or_default(),
        })
    }
}

/// One origin pull (cache) policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginPullPolicyBlock {
    pub enabled: bool,
    pub expire_policy: String,
    pub expire_seconds: i64,
    pub force_bypass_cache: bool,
    pub honor_must_revalidate: bool,
    pub honor_no_cache: bool,
    pub honor_no_store: bool,
    pub honor_private: bool,
    pub honor_smax_age: bool,
    pub http_headers: String,
    pub must_revalidate_to_no_cache: bool,
    pub no_cache_behavior: String,
    pub update_http_headers_on_304_response: bool,
    pub default_cache_behavior: String,
    pub max_age_zero_to_no_cache: bool,
    pub content_type_filter: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

impl Default for OriginPullPolicyBlock {
    fn default() -> Self {
        Self {
            enabled: true,
            expire_policy: "CACHE_CONTROL".to_string(),
            expire_seconds: 31_536_000,
            force_bypass_cache: false,
            honor_must_revalidate: true,
            honor_no_cache: true,
            honor_no_store: true,
            honor_private: true,
            honor_smax_age: true,
            http_headers: wildcard(),
            must_revalidate_to_no_cache: true,
            no_cache_behavior: "spec".to_string(),
            update_http_headers_on_304_response: true,
            default_cache_behavior: "ttl".to_string(),
            max_age_zero_to_no_cache: false,
            content_type_filter: wildcard(),
            header_filter: wildcard(),
            method_filter: wildcard(),
            path_filter: wildcard(),
        }
    }
}

impl OriginPullPolicyBlock {
    pub fn validate(&self, index: usize) -> Result<()> {
        one_of(
            RuleFamily::OriginPullPolicy,
            index,
            "expire_policy",
            &self.expire_policy,
            &EXPIRE_POLICIES,
        )
    }
}

impl From<OriginPullPolicyBlock> for OriginPullPolicy {
    fn from(b: OriginPullPolicyBlock) -> Self {
        Self {
            enabled: b.enabled,
            expire_policy: b.expire_policy,
            expire_seconds: b.expire_seconds,
            force_bypass_cache: b.force_bypass_cache,
            honor_must_revalidate: b.honor_must_revalidate,
            honor_no_cache: b.honor_no_cache,
            honor_no_store: b.honor_no_store,
            honor_private: b.honor_private,
            honor_smax_age: b.honor_smax_age,
            http_headers: b.http_headers,
            must_revalidate_to_no_cache: b.must_revalidate_to_no_cache,
            no_cache_behavior: b.no_cache_behavior,
            update_http_headers_on_304_response: b.update_http_headers_on_304_response,
            default_cache_behavior: b.default_cache_behavior,
            max_age_zero_to_no_cache: b.max_age_zero_to_no_cache,
            content_type_filter: b.content_type_filter,
            header_filter: b.header_filter,
            method_filter: b.method_filter,
            path_filter: b.path_filter,
        }
    }
}

impl From<OriginPullPolicy> for OriginPullPolicyBlock {
    fn from(w: OriginPullPolicy) -> Self {
        Self {
            enabled: w.enabled,
            expire_policy: w.expire_policy,
            expire_seconds: w.expire_seconds,
            force_bypass_cache: w.force_bypass_cache,
            honor_must_revalidate: w.honor_must_revalidate,
            honor_no_cache: w.honor_no_cache,
            honor_no_store: w.honor_no_store,
            honor_private: w.honor_private,
            honor_smax_age: w.honor_smax_age,
            http_headers: w.http_headers,
            must_revalidate_to_no_cache: w.must_revalidate_to_no_cache,
            no_cache_behavior: w.no_cache_behavior,
            update_http_headers_on_304_response: w.update_http_headers_on_304_response,
            default_cache_behavior: w.default_cache_behavior,
            max_age_zero_to_no_cache: w.max_age_zero_to_no_cache,
            content_type_filter: w.content_type_filter,
            header_filter: w.header_filter,
            method_filter: w.method_filter,
            path_filter: w.path_filter,
        }
    }
}

/// Request edge rule, used by both the origin and client directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestModificationBlock {
    pub enabled: bool,
    pub flow_control: String,
    pub add_headers: String,
    pub url_pattern: String,
    pub url_rewrite: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

impl Default for RequestModificationBlock {
    fn default() -> Self {
        Self {
            enabled: true,
            flow_control: "next".to_string(),
            add_headers: String::new(),
            url_pattern: String::new(),
            url_rewrite: String::new(),
            header_filter: wildcard(),
            method_filter: wildcard(),
            path_filter: wildcard(),
        }
    }
}

impl RequestModificationBlock {
    pub fn validate(&self, family: RuleFamily, index: usize) -> Result<()> {
        one_of(family, index, "flow_control", &self.flow_control, &FLOW_CONTROLS)
    }
}

impl From<RequestModificationBlock> for RequestModification {
    fn from(b: RequestModificationBlock) -> Self {
        Self {
            enabled: b.enabled,
            flow_control: b.flow_control,
            add_headers: b.add_headers,
            url_pattern: b.url_pattern,
            url_rewrite: b.url_rewrite,
            header_filter: b.header_filter,
            method_filter: b.method_filter,
            path_filter: b.path_filter,
        }
    }
}

impl From<RequestModification> for RequestModificationBlock {
    fn from(w: RequestModification) -> Self {
        Self {
            enabled: w.enabled,
            flow_control: w.flow_control,
            add_headers: w.add_headers,
            url_pattern: w.url_pattern,
            url_rewrite: w.url_rewrite,
            header_filter: w.header_filter,
            method_filter: w.method_filter,
            path_filter: w.path_filter,
        }
    }
}

/// Response edge rule, used by both the origin and client directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseModificationBlock {
    pub enabled: bool,
    pub flow_control: String,
    pub add_headers: String,
    pub status_code_match: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

impl Default for ResponseModificationBlock {
    fn default() -> Self {
        Self {
            enabled: true,
            flow_control: "next".to_string(),
            add_headers: String::new(),
            status_code_match: wildcard(),
            header_filter: wildcard(),
            method_filter: wildcard(),
            path_filter: wildcard(),
        }
    }
}

impl ResponseModificationBlock {
    pub fn validate(&self, family: RuleFamily, index: usize) -> Result<()> {
        one_of(family, index, "flow_control", &self.flow_control, &FLOW_CONTROLS)
    }
}

impl From<ResponseModificationBlock> for ResponseModification {
    fn from(b: ResponseModificationBlock) -> Self {
        Self {
            enabled: b.enabled,
            flow_control: b.flow_control,
            add_headers: b.add_headers,
            status_code_match: b.status_code_match,
            header_filter: b.header_filter,
            method_filter: b.method_filter,
            path_filter: b.path_filter,
        }
    }
}

impl From<ResponseModification> for ResponseModificationBlock {
    fn from(w: ResponseModification) -> Self {
        Self {
            enabled: w.enabled,
            flow_control: w.flow_control,
            add_headers: w.add_headers,
            status_code_match: w.status_code_match,
            header_filter: w.header_filter,
            method_filter: w.method_filter,
            path_filter: w.path_filter,
        }
    }
}

/// Browser cache policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheControlBlock {
    pub enabled: bool,
    /// Seconds, sent to clients as `max-age`
    pub max_age: i64,
    pub must_revalidate: bool,
    pub synchronize_max_age: bool,
    /// Replace the origin's `Cache-Control` instead of only filling it in
    #[serde(rename = "override")]
    pub override_origin: bool,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

impl Default for CacheControlBlock {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: 0,
            must_revalidate: false,
            synchronize_max_age: false,
            override_origin: false,
            header_filter: wildcard(),
            method_filter: wildcard(),
            path_filter: wildcard(),
        }
    }
}

impl CacheControlBlock {
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.max_age < 0 {
            return Err(Error::config(format!(
                "{}[{}]: \"max_age\" must not be negative, got {}",
                RuleFamily::CacheControl,
                index,
                self.max_age
            )));
        }
        Ok(())
    }
}

impl From<CacheControlBlock> for CacheControl {
    fn from(b: CacheControlBlock) -> Self {
        Self {
            enabled: b.enabled,
            max_age: b.max_age,
            must_revalidate: b.must_revalidate,
            synchronize_max_age: b.synchronize_max_age,
            override_origin: b.override_origin,
            header_filter: b.header_filter,
            method_filter: b.method_filter,
            path_filter: b.path_filter,
        }
    }
}

impl From<CacheControl> for CacheControlBlock {
    fn from(w: CacheControl) -> Self {
        Self {
            enabled: w.enabled,
            max_age: w.max_age,
            must_revalidate: w.must_revalidate,
            synchronize_max_age: w.synchronize_max_age,
            override_origin: w.override_origin,
            header_filter: w.header_filter,
            method_filter: w.method_filter,
            path_filter: w.path_filter,
        }
    }
}

/// Static header injection rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticHeaderBlock {
    pub enabled: bool,
    pub http: String,
    pub origin_pull: String,
    pub client_request: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

impl Default for StaticHeaderBlock {
    fn default() -> Self {
        Self {
            enabled: true,
            http: String::new(),
            origin_pull: String::new(),
            client_request: String::new(),
            header_filter: wildcard(),
            method_filter: wildcard(),
            path_filter: wildcard(),
        }
    }
}

impl From<StaticHeaderBlock> for StaticHeader {
    fn from(b: StaticHeaderBlock) -> Self {
        Self {
            enabled: b.enabled,
            http: b.http,
            origin_pull: b.origin_pull,
            client_request: b.client_request,
            header_filter: b.header_filter,
            method_filter: b.method_filter,
            path_filter: b.path_filter,
        }
    }
}

impl From<StaticHeader> for StaticHeaderBlock {
    fn from(w: StaticHeader) -> Self {
        Self {
            enabled: w.enabled,
            http: w.http,
            origin_pull: w.origin_pull,
            client_request: w.client_request,
            header_filter: w.header_filter,
            method_filter: w.method_filter,
            path_filter: w.path_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_defaults() {
        let block: OriginPullPolicyBlock = serde_json::from_str("{}").unwrap();
        assert!(block.enabled);
        assert_eq!(block.expire_policy, "CACHE_CONTROL");
        assert_eq!(block.expire_seconds, 31_536_000);
        assert_eq!(block.no_cache_behavior, "spec");
        assert_eq!(block.path_filter, "*");
        assert!(!block.max_age_zero_to_no_cache);
    }

    #[test]
    fn cache_control_defaults_and_override_key() {
        let block: CacheControlBlock =
            serde_json::from_value(serde_json::json!({ "max_age": 600, "override": true }))
                .unwrap();
        assert!(block.enabled);
        assert!(block.override_origin);
        assert_eq!(block.path_filter, "*");

        let wire = serde_json::to_value(CacheControl::from(block)).unwrap();
        assert_eq!(wire["maxAge"], 600);
        assert_eq!(wire["override"], true);
    }

    #[test]
    fn rejects_negative_max_age() {
        let block = CacheControlBlock {
            max_age: -1,
            ..Default::default()
        };
        let err = block.validate(1).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("cache_control[1]"));
    }

    #[test]
    fn rejects_unknown_expire_policy() {
        let block = OriginPullPolicyBlock {
            expire_policy: "FOREVER".to_string(),
            ..Default::default()
        };
        let err = block.validate(2).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("origin_pull_policy[2]"));
    }

    #[test]
    fn rejects_unknown_flow_control() {
        let block = RequestModificationBlock {
            flow_control: "stop".to_string(),
            ..Default::default()
        };
        assert!(block.validate(RuleFamily::ClientRequestEdgeRule, 0).is_err());
        assert!(RequestModificationBlock::default()
            .validate(RuleFamily::ClientRequestEdgeRule, 0)
            .is_ok());
    }

    #[test]
    fn origin_enums_are_lowercased() {
        let mut origin = OriginBlock {
            primary: Some(7),
            origin_pull_protocol: "HTTPS".to_string(),
            redirect_action: "Follow".to_string(),
            ..Default::default()
        };
        origin.normalize().unwrap();
        assert_eq!(origin.origin_pull_protocol, "https");
        assert_eq!(origin.redirect_action, "follow");

        origin.redirect_action = "bounce".to_string();
        assert!(origin.normalize().is_err());
    }

    #[test]
    fn origin_absent_when_api_sends_nothing() {
        assert!(OriginBlock::from_wire(None, None, None).is_none());
        assert!(LogsBlock::from_wire(None, None).is_none());
    }

    #[test]
    fn policy_maps_both_ways() {
        let block = OriginPullPolicyBlock {
            expire_policy: "NEVER_EXPIRE".to_string(),
            honor_smax_age: false,
            ..Default::default()
        };
        let wire = OriginPullPolicy::from(block.clone());
        assert!(!wire.honor_smax_age);
        assert_eq!(OriginPullPolicyBlock::from(wire), block);
    }
}
