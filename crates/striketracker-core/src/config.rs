//! Configuration types for the StrikeTracker provider
//!
//! This module defines the provider block configuration and the
//! per-operation context that bounds every remote call.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{Error, Result};

/// Default StrikeTracker API endpoint
pub const DEFAULT_API_BASE: &str = "https://striketracker.highwinds.com";

/// Application id reported to StrikeTracker when none is configured
pub const DEFAULT_APPLICATION_ID: &str = "wurlwind-terraform";

/// Environment variable holding the API token
pub const ENV_AUTHORIZATION_HEADER_KEY: &str = "AUTHORIZATIONHEADERKEY";

/// Environment variable holding the application id
pub const ENV_APPLICATION_ID: &str = "APPLICATIONID";

/// Environment variable overriding the API endpoint
pub const ENV_API_BASE: &str = "STRIKETRACKER_API_BASE";

/// Environment variable overriding the per-request timeout
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "STRIKETRACKER_REQUEST_TIMEOUT_SECS";

/// Provider block configuration
///
/// The `Debug` implementation never prints the authorization key.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer token for the StrikeTracker API
    pub authorization_header_key: String,

    /// Value of the `X-Application-Id` header
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// API endpoint, without the `/api/v1` suffix
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Budget for a single remote call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("authorization_header_key", &"<REDACTED>")
            .field("application_id", &self.application_id)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration with defaults for everything but the token
    pub fn new(authorization_header_key: impl Into<String>) -> Self {
        Self {
            authorization_header_key: authorization_header_key.into(),
            application_id: default_application_id(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Set the application id
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = application_id.into();
        self
    }

    /// Set the API endpoint
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `AUTHORIZATIONHEADERKEY` (required)
    /// - `APPLICATIONID`
    /// - `STRIKETRACKER_API_BASE`
    /// - `STRIKETRACKER_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(ENV_AUTHORIZATION_HEADER_KEY).map_err(|_| {
            Error::config(format!(
                "{} is required. Set it via: export {}=your_token",
                ENV_AUTHORIZATION_HEADER_KEY, ENV_AUTHORIZATION_HEADER_KEY
            ))
        })?;

        let mut config = Self::new(key);

        if let Ok(application_id) = std::env::var(ENV_APPLICATION_ID) {
            config.application_id = application_id;
        }
        if let Ok(api_base) = std::env::var(ENV_API_BASE) {
            config.api_base = api_base;
        }
        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number of seconds. Got: {}",
                    ENV_REQUEST_TIMEOUT_SECS, raw
                ))
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.authorization_header_key.trim().is_empty() {
            return Err(Error::config("authorization_header_key cannot be empty"));
        }

        if self.application_id.trim().is_empty() {
            return Err(Error::config("application_id cannot be empty"));
        }

        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            return Err(Error::config(format!(
                "api_base must use HTTP or HTTPS scheme. Got: {}",
                self.api_base
            )));
        }

        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(Error::config(format!(
                "request_timeout_secs must be between 1 and 300 seconds. Got: {}",
                self.request_timeout_secs
            )));
        }

        Ok(())
    }

    /// Per-request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_application_id() -> String {
    DEFAULT_APPLICATION_ID.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    8
}

/// Context for one Create/Read/Update/Delete cycle
///
/// Every remote call of the cycle runs through [`OperationContext::run`],
/// which bounds it by the per-request timeout and, if set, by the overall
/// deadline of the cycle, whichever comes first.
#[derive(Debug, Clone)]
pub struct OperationContext {
    operation: String,
    request_timeout: Duration,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// Create a context for `operation` with the given per-request timeout
    pub fn new(operation: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            operation: operation.into(),
            request_timeout,
            deadline: None,
        }
    }

    /// Bound the whole cycle by `budget` from now
    pub fn with_deadline(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    /// Name of the running operation
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Time left before the overall deadline, if one is set
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Run one remote call under this context's limits
    ///
    /// An exhausted budget surfaces as [`Error::Timeout`]. The call is not
    /// retried.
    pub async fn run<F, T>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let budget = match self.remaining() {
            Some(remaining) => remaining.min(self.request_timeout),
            None => self.request_timeout,
        };

        match tokio::time::timeout(budget, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                operation: self.operation.clone(),
                after: budget,
            }),
        }
    }
}
