//! Resource registry
//!
//! Maps Terraform type names to the factories that build their resources,
//! so the runtime boundary can dispatch without a hardcoded match.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use striketracker_core::registry::ResourceRegistry;
//! use striketracker_core::resources::register_builtin_resources;
//!
//! let registry = ResourceRegistry::new();
//! register_builtin_resources(&registry);
//!
//! let origin = registry.create_resource("striketracker_origin", api)?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::traits::{CdnApi, Resource, ResourceFactory};

/// Registry of resource factories keyed by Terraform type name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: RwLock<HashMap<String, Box<dyn ResourceFactory>>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource factory
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_resource(&self, name: impl Into<String>, factory: Box<dyn ResourceFactory>) {
        let name = name.into();
        tracing::debug!("Registering resource type {}", name);
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        resources.insert(name, factory);
    }

    /// Build the resource registered under `name`
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Resource>)`: resource bound to `api`
    /// - `Err(Error::Config)`: if no factory is registered under `name`
    pub fn create_resource(&self, name: &str, api: Arc<dyn CdnApi>) -> Result<Box<dyn Resource>> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let factory = resources
            .get(name)
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", name)))?;
        Ok(factory.create(api))
    }

    /// List all registered resource type names, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, name: &str) -> bool {
        let resources = self.resources.read().unwrap_or_else(PoisonError::into_inner);
        resources.contains_key(name)
    }
}
