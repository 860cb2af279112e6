use serde::{Deserialize, Serialize};

use super::rules::{
    CacheControl, OriginPullPolicy, RequestModification, ResponseModification, StaticHeader,
};

/// Full configuration of one scope
///
/// Scope identity (`id`, `name`, `platform`, `path`) sits at the top level of
/// the document, next to the feature blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub platform: String,
    pub path: String,
    pub hostname: Vec<ConfigurationHostname>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_pull_host: Option<OriginPullHost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_pull_protocol: Option<OriginPullProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_pull: Option<OriginPull>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_pull_cache_extension: Option<OriginPullCacheExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_logs: Option<AccessLogs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_pull_logs: Option<OriginPullLogs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key_modification: Option<CacheKeyModification>,
    pub cache_control: Vec<CacheControl>,
    pub origin_pull_policy: Vec<OriginPullPolicy>,
    pub origin_request_modification: Vec<RequestModification>,
    pub origin_response_modification: Vec<ResponseModification>,
    pub client_request_modification: Vec<RequestModification>,
    pub client_response_modification: Vec<ResponseModification>,
    pub static_header: Vec<StaticHeader>,
}

impl Configuration {
    /// Hostnames as plain strings, in API order
    pub fn domains(&self) -> Vec<String> {
        self.hostname.iter().map(|h| h.domain.clone()).collect()
    }

    /// Hostnames that need a DNS record pointing at the CDN
    ///
    /// Wildcards and the `hwcdn.net` names the platform assigns itself are
    /// left out.
    pub fn actionable_domains(&self) -> Vec<String> {
        self.hostname
            .iter()
            .map(|h| h.domain.as_str())
            .filter(|domain| !domain.starts_with("*.") && !is_platform_domain(domain))
            .map(str::to_string)
            .collect()
    }
}

/// Domain under which the platform names scopes and hosts
pub const PLATFORM_DOMAIN: &str = "hwcdn.net";

fn is_platform_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.');
    domain == PLATFORM_DOMAIN
        || domain
            .strip_suffix(PLATFORM_DOMAIN)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Body of a scope creation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScopeCreate {
    pub name: String,
    pub platform: String,
    pub path: String,
    pub hostname: Vec<ConfigurationHostname>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationHostname {
    pub domain: String,
}

/// Origins pulled from, referenced by origin id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginPullHost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<u64>,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginPullProtocol {
    pub protocol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OriginPull {
    pub redirect_action: String,
}

/// Serve stale content when the origin is slow or unreachable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OriginPullCacheExtension {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_cache_extension: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_unreachable_cache_extension: Option<i64>,
}

/// Normalization applied to cache keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheKeyModification {
    pub normalize_key_path_to_lower_case: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessLogs {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginPullLogs {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_arrays_keep_api_order() {
        let raw = serde_json::json!({
            "id": 42,
            "name": "images",
            "platform": "CDS",
            "path": "/images",
            "staticHeader": [
                { "enabled": true, "http": "X-First: 1" },
                { "enabled": false, "http": "X-Second: 2" }
            ]
        });
        let config: Configuration = serde_json::from_value(raw).unwrap();
        assert_eq!(config.id, Some(42));
        assert_eq!(config.static_header[0].http, "X-First: 1");
        assert_eq!(config.static_header[1].http, "X-Second: 2");
        assert!(config.origin_pull_policy.is_empty());
    }

    #[test]
    fn actionable_domains_skip_wildcards_and_platform_names() {
        let config = Configuration {
            hostname: ["cdn.example.com", "*.example.com", "cds.a1b2c3.hwcdn.net", "myhwcdn.net"]
                .into_iter()
                .map(|domain| ConfigurationHostname {
                    domain: domain.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        assert_eq!(
            config.actionable_domains(),
            vec!["cdn.example.com".to_string(), "myhwcdn.net".to_string()]
        );
        assert_eq!(config.domains().len(), 4);
    }

    #[test]
    fn empty_rule_arrays_are_sent() {
        let value = serde_json::to_value(Configuration::default()).unwrap();
        assert_eq!(value["originPullPolicy"], serde_json::json!([]));
        assert_eq!(value["clientResponseModification"], serde_json::json!([]));
    }
}
