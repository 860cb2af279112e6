// # striketracker-core
//
// Core library of the StrikeTracker CDN Terraform provider.
//
// ## Architecture Overview
//
// - **codec**: weighted rule sets <-> ordered rule lists
// - **models**: wire types of the StrikeTracker API
// - **CdnApi**: trait for the remote REST API, implemented by the client crate
// - **Resource**: CRUD entry points for one Terraform resource type
// - **ResourceRegistry**: type name -> resource factory
// - **StrikeTrackerProvider**: dispatches runtime requests to resources
//
// Resources never retry and never hold state between calls. Each call
// builds its own rule collections and carries its own OperationContext.

pub mod codec;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod provider;
pub mod registry;
pub mod resources;
pub mod traits;

// Re-export core types for convenience
pub use codec::{RuleFamily, Weighted};
pub use config::{OperationContext, ProviderConfig};
pub use error::{Error, Result};
pub use provider::{Operation, ProviderRequest, ProviderResponse, StrikeTrackerProvider};
pub use registry::ResourceRegistry;
pub use traits::{CdnApi, Resource, ResourceFactory};
