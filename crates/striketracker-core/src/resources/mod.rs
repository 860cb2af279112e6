//! Terraform resources exposed by the provider
//!
//! | type name | id | import id |
//! |---|---|---|
//! | `striketracker_origin` | origin id | `account_hash/ID` |
//! | `striketracker_certificate` | certificate id | `account_hash/ID` |
//! | `striketracker_host` | host hash | `account_hash/ID` |
//! | `striketracker_configuration` | scope id | `account_hash/host_hash/scope_id` |
//! | `striketracker_default_configuration` | root scope id | `account_hash/host_hash/scope_id` |

pub mod blocks;
pub mod certificate;
pub mod configuration;
pub mod host;
pub mod origin;

pub use certificate::{CertificateResource, CertificateState};
pub use configuration::{ConfigurationResource, ConfigurationState, DefaultConfigurationResource};
pub use host::{HostResource, HostState};
pub use origin::{OriginResource, OriginState};

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::registry::ResourceRegistry;
use crate::traits::{CdnApi, Resource, ResourceFactory};

/// Parse a JSON state object into a typed state record
pub(crate) fn from_state<T: DeserializeOwned>(type_name: &str, state: Value) -> Result<T> {
    serde_json::from_value(state)
        .map_err(|e| Error::invalid_input(format!("invalid {} state: {}", type_name, e)))
}

/// Serialize a typed state record back into a JSON state object
pub(crate) fn to_state<T: Serialize>(state: &T) -> Result<Value> {
    serde_json::to_value(state).map_err(|e| Error::state(e.to_string()))
}

/// A read that found nothing, reported as an error
///
/// Used where the object must exist, e.g. right after creating it.
pub(crate) fn vanished(type_name: &str, id: &str) -> Error {
    Error::not_found(format!("{} {} does not exist", type_name, id))
}

/// Map "not found" to `None`, keep everything else
pub(crate) fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Remove an object whose create did not complete, then return `err`
///
/// The object was created remotely but its id never reached state. A failed
/// cleanup is logged with the id and the original error is still returned.
pub(crate) async fn roll_back<F>(type_name: &str, id: &str, err: Error, cleanup: F) -> Error
where
    F: Future<Output = Result<()>>,
{
    tracing::warn!("Create of {} {} failed, removing it: {}", type_name, id, err);
    match cleanup.await {
        Ok(()) => {}
        Err(cleanup_err) if cleanup_err.is_not_found() => {}
        Err(cleanup_err) => tracing::error!(
            "{} {} is left on the remote and untracked: {}",
            type_name,
            id,
            cleanup_err
        ),
    }
    err
}

struct Factory<F>(F);

impl<F> ResourceFactory for Factory<F>
where
    F: Fn(Arc<dyn CdnApi>) -> Box<dyn Resource> + Send + Sync,
{
    fn create(&self, api: Arc<dyn CdnApi>) -> Box<dyn Resource> {
        (self.0)(api)
    }
}

fn factory<F>(build: F) -> Box<dyn ResourceFactory>
where
    F: Fn(Arc<dyn CdnApi>) -> Box<dyn Resource> + Send + Sync + 'static,
{
    Box::new(Factory(build))
}

/// Register every built-in resource type with a registry
pub fn register_builtin_resources(registry: &ResourceRegistry) {
    registry.register_resource(
        origin::TYPE_NAME,
        factory(|api| Box::new(OriginResource::new(api))),
    );
    registry.register_resource(
        certificate::TYPE_NAME,
        factory(|api| Box::new(CertificateResource::new(api))),
    );
    registry.register_resource(
        host::TYPE_NAME,
        factory(|api| Box::new(HostResource::new(api))),
    );
    registry.register_resource(
        configuration::TYPE_NAME,
        factory(|api| Box::new(ConfigurationResource::new(api))),
    );
    registry.register_resource(
        configuration::DEFAULT_TYPE_NAME,
        factory(|api| Box::new(DefaultConfigurationResource::new(api))),
    );
}
