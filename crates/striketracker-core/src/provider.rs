//! Runtime boundary
//!
//! The Terraform runtime talks to the provider in terms of a resource type,
//! an operation and a JSON state object. [`StrikeTrackerProvider`] resolves
//! the resource through the registry, builds the [`OperationContext`] for the
//! cycle and hands the state over.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{OperationContext, ProviderConfig};
use crate::error::{Error, Result};
use crate::registry::ResourceRegistry;
use crate::resources::register_builtin_resources;
use crate::traits::CdnApi;

/// Lifecycle operation requested by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Exists,
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Exists => "exists",
            Operation::Import => "import",
        };
        f.write_str(name)
    }
}

/// One call from the runtime
///
/// `state` carries the planned or current state for every operation but
/// `import`, which carries `id` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Terraform type name, e.g. `striketracker_origin`
    pub resource: String,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Overall budget of the cycle, on top of the per-request timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

impl ProviderRequest {
    /// Request carrying a state object
    pub fn with_state(resource: impl Into<String>, operation: Operation, state: Value) -> Self {
        Self {
            resource: resource.into(),
            operation,
            state: Some(state),
            id: None,
            deadline_secs: None,
        }
    }

    /// Import request
    pub fn import(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: Operation::Import,
            state: None,
            id: Some(id.into()),
            deadline_secs: None,
        }
    }
}

/// Answer to the runtime
///
/// `state: null` after a read or import means the object is gone and must be
/// dropped from state. `exists` is only set for the `exists` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

/// The provider: one API client plus the resource registry
pub struct StrikeTrackerProvider {
    api: Arc<dyn CdnApi>,
    registry: ResourceRegistry,
    request_timeout: Duration,
}

impl StrikeTrackerProvider {
    /// Create a provider with every built-in resource registered
    pub fn new(api: Arc<dyn CdnApi>, config: &ProviderConfig) -> Self {
        let registry = ResourceRegistry::new();
        register_builtin_resources(&registry);
        Self {
            api,
            registry,
            request_timeout: config.request_timeout(),
        }
    }

    /// The registry, e.g. to add resource types
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Run one request
    pub async fn dispatch(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        let resource = self
            .registry
            .create_resource(&request.resource, Arc::clone(&self.api))?;

        let mut ctx = OperationContext::new(
            format!("{} {}", request.operation, request.resource),
            self.request_timeout,
        );
        if let Some(secs) = request.deadline_secs {
            ctx = ctx.with_deadline(Duration::from_secs(secs));
        }

        tracing::debug!(
            "Dispatching {} via {}",
            ctx.operation(),
            self.api.api_name()
        );

        let operation = request.operation;
        let state = || {
            request.state.clone().ok_or_else(|| {
                Error::invalid_input(format!("{} requires a state object", operation))
            })
        };

        let response = match operation {
            Operation::Create => ProviderResponse {
                state: Some(resource.create(&ctx, state()?).await?),
                exists: None,
            },
            Operation::Read => ProviderResponse {
                state: resource.read(&ctx, state()?).await?,
                exists: None,
            },
            Operation::Update => ProviderResponse {
                state: Some(resource.update(&ctx, state()?).await?),
                exists: None,
            },
            Operation::Delete => {
                resource.delete(&ctx, state()?).await?;
                ProviderResponse::default()
            }
            Operation::Exists => ProviderResponse {
                state: None,
                exists: Some(resource.exists(&ctx, state()?).await?),
            },
            Operation::Import => {
                let id = request
                    .id
                    .as_deref()
                    .ok_or_else(|| Error::invalid_input("import requires an id"))?;
                let seed = resource.import(id)?;
                ProviderResponse {
                    state: resource.read(&ctx, seed).await?,
                    exists: None,
                }
            }
        };

        Ok(response)
    }
}
