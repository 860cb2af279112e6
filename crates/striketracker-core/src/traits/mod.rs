//! Core traits for the StrikeTracker provider
//!
//! - [`CdnApi`]: talk to the remote StrikeTracker REST API
//! - [`Resource`]: CRUD entry points for one Terraform resource type
//! - [`ResourceFactory`]: build resources bound to an API

pub mod cdn_api;
pub mod resource;

pub use cdn_api::CdnApi;
pub use resource::{Resource, ResourceFactory};
