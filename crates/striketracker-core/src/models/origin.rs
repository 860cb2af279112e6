use serde::{Deserialize, Serialize};

/// An origin server as stored by StrikeTracker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Origin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub hostname: String,
    pub port: i64,
    pub path: String,
    pub authentication_type: String,
    #[serde(rename = "certificateCN")]
    pub certificate_cn: String,
    #[serde(rename = "errorCacheTTLSeconds")]
    pub error_cache_ttl_seconds: i64,
    pub max_connections_per_edge: i64,
    pub max_connections_per_edge_enabled: bool,
    pub maximum_origin_pull_seconds: i64,
    pub max_retry_count: i64,
    pub origin_cache_headers: String,
    pub origin_default_keep_alive: i64,
    pub origin_pull_headers: String,
    pub origin_pull_neg_linger: String,
    pub request_timeout_seconds: i64,
    pub secure_port: i64,
    pub verify_certificate: bool,
}
