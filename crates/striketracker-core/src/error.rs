//! Error types for the StrikeTracker provider
//!
//! This module defines all error types used throughout the crate.
//!
//! Errors fall into three groups:
//! - configuration errors (bad weights, malformed import ids, invalid provider
//!   settings), raised before any remote mutation
//! - remote-state errors (not found, partial objects)
//! - transport errors (timeouts, HTTP failures), propagated unchanged

use std::time::Duration;

use thiserror::Error;

use crate::codec::RuleFamily;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the StrikeTracker provider
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two rules in one family share a weight
    #[error("Duplicate weight in {family}: weight {weight} is assigned to more than one rule")]
    DuplicateWeight {
        /// Rule family the collision was found in
        family: RuleFamily,
        /// The weight assigned twice
        weight: i64,
    },

    /// A rule weight does not address a slot in its collection
    #[error("Weight out of range in {family}: weight {weight} is outside 0..{len}")]
    WeightOutOfRange {
        /// Rule family the weight belongs to
        family: RuleFamily,
        /// The offending weight
        weight: i64,
        /// Number of rules in the collection
        len: usize,
    },

    /// A slot in the ordered collection was never filled
    #[error("Missing weight in {family}: no rule has weight {index}")]
    WeightGap {
        /// Rule family with the gap
        family: RuleFamily,
        /// The empty position
        index: usize,
    },

    /// Malformed import identifier
    #[error("unexpected format of import ID ({input}), expected {expected}")]
    InvalidImportId {
        /// The identifier as supplied
        input: String,
        /// Expected layout, e.g. `account_hash/ID`
        expected: &'static str,
    },

    /// Remote returned an object with required parts missing
    #[error("Remote object incomplete: {0}")]
    MissingRemoteObject(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A remote call exceeded its deadline
    #[error("Timed out after {after:?} during {operation}")]
    Timeout {
        /// Operation that was running
        operation: String,
        /// Budget that was exhausted
        after: Duration,
    },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failures while building resource state
    #[error("Error setting state: {0}")]
    State(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "missing remote object" error
    pub fn missing_remote(msg: impl Into<String>) -> Self {
        Self::MissingRemoteObject(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// The remote reported the resource as gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The error stems from user configuration and retrying cannot help
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::DuplicateWeight { .. }
                | Self::WeightOutOfRange { .. }
                | Self::WeightGap { .. }
                | Self::InvalidImportId { .. }
                | Self::InvalidInput(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
