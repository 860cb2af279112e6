// # CDN API Trait
//
// Defines the interface to the remote StrikeTracker REST API.
//
// ## Implementations
//
// - HTTP: `striketracker-client` crate
// - In-memory fakes in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use striketracker_core::{CdnApi, OperationContext};
//
// let ctx = OperationContext::new("read", std::time::Duration::from_secs(8));
// let origin = api.get_origin(&ctx, "a1b2c3d4", 12).await?;
// ```

use async_trait::async_trait;

use crate::config::OperationContext;
use crate::error::Result;
use crate::models::{Certificate, Configuration, Host, Origin, ScopeCreate};

/// Trait for StrikeTracker API implementations
///
/// Every method takes the [`OperationContext`] of the running cycle and
/// must bound its network call with [`OperationContext::run`].
///
/// # Error contract
///
/// - A missing remote object is reported as [`crate::Error::NotFound`];
///   resources rely on this to drop vanished instances from state.
/// - Timeouts and transport failures are returned as-is. Implementations do
///   not retry.
#[async_trait]
pub trait CdnApi: Send + Sync {
    /// Fetch an origin
    async fn get_origin(&self, ctx: &OperationContext, account_hash: &str, id: u64)
    -> Result<Origin>;

    /// Create an origin, returning it with its assigned id
    async fn create_origin(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        origin: &Origin,
    ) -> Result<Origin>;

    /// Replace an origin
    async fn update_origin(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
        origin: &Origin,
    ) -> Result<Origin>;

    /// Delete an origin
    async fn delete_origin(&self, ctx: &OperationContext, account_hash: &str, id: u64)
    -> Result<()>;

    /// Fetch a certificate
    async fn get_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
    ) -> Result<Certificate>;

    /// Upload a certificate
    async fn upload_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        certificate: &Certificate,
    ) -> Result<Certificate>;

    /// Replace a certificate
    async fn update_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
        certificate: &Certificate,
    ) -> Result<Certificate>;

    /// Delete a certificate
    async fn delete_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
    ) -> Result<()>;

    /// Fetch a host by hash code
    async fn get_host(&self, ctx: &OperationContext, account_hash: &str, host_hash: &str)
    -> Result<Host>;

    /// Create a host
    async fn create_host(&self, ctx: &OperationContext, account_hash: &str, host: &Host)
    -> Result<Host>;

    /// Replace a host's name and services
    async fn update_host(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        host: &Host,
    ) -> Result<Host>;

    /// Delete a host
    async fn delete_host(&self, ctx: &OperationContext, account_hash: &str, host_hash: &str)
    -> Result<()>;

    /// Fetch the configuration of a scope
    async fn get_configuration(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
    ) -> Result<Configuration>;

    /// Create a scope under a host
    async fn create_scope(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope: &ScopeCreate,
    ) -> Result<Configuration>;

    /// Replace the configuration of a scope
    async fn update_configuration(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
        configuration: &Configuration,
    ) -> Result<Configuration>;

    /// Delete a scope
    async fn delete_scope(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
    ) -> Result<()>;

    /// Get the API name (for logging/debugging)
    fn api_name(&self) -> &'static str;
}
