//! Ordered rule payloads
//!
//! The API keeps each family as a JSON array; array position is precedence.
//! None of these types carries a weight.

use serde::{Deserialize, Serialize};

/// Cache behavior applied to content pulled from the origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OriginPullPolicy {
    pub enabled: bool,
    pub expire_policy: String,
    pub expire_seconds: i64,
    pub force_bypass_cache: bool,
    pub honor_must_revalidate: bool,
    pub honor_no_cache: bool,
    pub honor_no_store: bool,
    pub honor_private: bool,
    #[serde(rename = "honorSMaxAge")]
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

/// Edge rule rewriting a request (client-facing or origin-facing)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestModification {
    pub enabled: bool,
    pub flow_control: String,
    pub add_headers: String,
    pub url_pattern: String,
    pub url_rewrite: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

/// Edge rule rewriting a response (client-facing or origin-facing)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseModification {
    pub enabled: bool,
    pub flow_control: String,
    pub add_headers: String,
    pub status_code_match: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

/// Headers injected on client responses, origin pulls or client requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticHeader {
    pub enabled: bool,
    pub http: String,
    pub origin_pull: String,
    pub client_request: String,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}

/// Browser cache policy: the max-age handed to clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheControl {
    pub enabled: bool,
    pub max_age: i64,
    pub must_revalidate: bool,
    pub synchronize_max_age: bool,
    #[serde(rename = "override")]
    pub override_origin: bool,
    pub header_filter: String,
    pub method_filter: String,
    pub path_filter: String,
}
