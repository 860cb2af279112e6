// # Resource Trait
//
// Defines the CRUD entry points the Terraform runtime calls for one
// resource type.
//
// State crosses this boundary as JSON objects (the shape the runtime holds
// after decoding HCL). Each implementation maps it onto typed records before
// touching the API, so malformed input fails before any remote call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::OperationContext;
use crate::error::Result;
use crate::traits::CdnApi;

/// CRUD entry points for one resource type
///
/// Implementations are stateless: everything they need arrives in the state
/// object or lives behind the [`CdnApi`]. They never retry.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Terraform type name, e.g. `striketracker_origin`
    fn type_name(&self) -> &'static str;

    /// Create the remote object from planned state
    ///
    /// Returns the state read back after creation, including the new `id`.
    async fn create(&self, ctx: &OperationContext, planned: Value) -> Result<Value>;

    /// Refresh state from the remote object
    ///
    /// Returns `Ok(None)` when the object no longer exists, which tells the
    /// runtime to drop it from state.
    async fn read(&self, ctx: &OperationContext, current: Value) -> Result<Option<Value>>;

    /// Push planned state to the existing remote object
    async fn update(&self, ctx: &OperationContext, planned: Value) -> Result<Value>;

    /// Delete the remote object
    async fn delete(&self, ctx: &OperationContext, current: Value) -> Result<()>;

    /// Check whether the remote object still exists
    async fn exists(&self, ctx: &OperationContext, current: Value) -> Result<bool>;

    /// Turn an import identifier into the minimal state a read can start from
    ///
    /// Performs no network call.
    fn import(&self, id: &str) -> Result<Value>;
}

/// Helper trait for constructing resources bound to an API
pub trait ResourceFactory: Send + Sync {
    /// Create a resource instance
    fn create(&self, api: Arc<dyn CdnApi>) -> Box<dyn Resource>;
}
