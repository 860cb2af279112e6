//! Wire models for the StrikeTracker API v1
//!
//! These types mirror the JSON the API accepts and returns (camelCase).
//! Terraform-facing state lives with each resource in [`crate::resources`];
//! the two sides meet through explicit `From` conversions.

pub mod certificate;
pub mod configuration;
pub mod host;
pub mod origin;
pub mod rules;

pub use certificate::Certificate;
pub use configuration::{
    AccessLogs, CacheKeyModification, Configuration, ConfigurationHostname, OriginPull,
    OriginPullCacheExtension, OriginPullHost, OriginPullLogs, OriginPullProtocol, ScopeCreate,
    PLATFORM_DOMAIN,
};
pub use host::{DeliveryService, Host, HostScope, CDS_PLATFORM};
pub use origin::Origin;
pub use rules::{
    CacheControl, OriginPullPolicy, RequestModification, ResponseModification, StaticHeader,
};
