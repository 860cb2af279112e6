// # StrikeTracker API Client
//
// `reqwest` implementation of the `CdnApi` trait for the StrikeTracker REST
// API v1.
//
// - One HTTP request per trait call
// - Every request is bounded by the caller's `OperationContext`
// - No retry, no caching; errors go back to the resource unchanged
// - The bearer token never appears in logs or `Debug` output
//
// ## API Reference
//
// Base: `{api_base}/api/v1/accounts/{account_hash}`
//
// - Origins: `POST /origins`, `GET|PUT|DELETE /origins/:id`
// - Certificates: `POST /certificates`, `GET|PUT|DELETE /certificates/:id`
// - Hosts: `POST /hosts`, `GET|PUT|DELETE /hosts/:host_hash`
// - Scopes: `POST /hosts/:host_hash/configuration/scopes`,
//   `GET|PUT|DELETE /hosts/:host_hash/configuration/:scope_id`

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use striketracker_core::config::{OperationContext, ProviderConfig};
use striketracker_core::models::{Certificate, Configuration, Host, Origin, ScopeCreate};
use striketracker_core::traits::CdnApi;
use striketracker_core::{Error, Result};

/// Name reported in provider errors
const API_NAME: &str = "striketracker";

/// Header carrying the application id
const APPLICATION_ID_HEADER: &str = "X-Application-Id";

/// Error document returned by the API alongside 4xx/5xx statuses
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    error: String,
    code: Option<u16>,
}

/// StrikeTracker REST client
///
/// # Security
///
/// The Debug implementation does NOT expose the authorization key.
pub struct StrikeTrackerClient {
    /// Bearer token
    /// ⚠️ NEVER log this value
    authorization_header_key: String,

    application_id: String,

    /// Endpoint without trailing slash
    api_base: String,

    client: reqwest::Client,
}

impl std::fmt::Debug for StrikeTrackerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrikeTrackerClient")
            .field("authorization_header_key", &"<REDACTED>")
            .field("application_id", &self.application_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl StrikeTrackerClient {
    /// Create a client from validated provider configuration
    ///
    /// Timeouts are not set on the HTTP client; each call is bounded by the
    /// `OperationContext` it runs under.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("terraform-provider-striketracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            authorization_header_key: config.authorization_header_key.clone(),
            application_id: config.application_id.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of `path` under an account
    fn url(&self, account_hash: &str, path: &str) -> String {
        format!("{}/api/v1/accounts/{}{}", self.api_base, account_hash, path)
    }

    /// Send one request and return the raw body of a successful response
    async fn execute(
        &self,
        ctx: &OperationContext,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<String> {
        tracing::debug!("{} {}", method, url);

        ctx.run(async move {
            let mut request = self
                .client
                .request(method, &url)
                .bearer_auth(&self.authorization_header_key)
                .header(APPLICATION_ID_HEADER, &self.application_id);
            if let Some(body) = &body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

            if !status.is_success() {
                return Err(status_error(status, &text, &url));
            }
            Ok(text)
        })
        .await
    }

    /// Send one request and decode the JSON response
    async fn call<T: DeserializeOwned>(
        &self,
        ctx: &OperationContext,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<T> {
        let text = self.execute(ctx, method, url, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::provider(API_NAME, format!("Failed to parse response: {}", e))
        })
    }
}

/// Map a failed response onto the error taxonomy
///
/// The API sometimes puts the real status in the error document, so `code`
/// wins over the HTTP status when present.
fn status_error(status: StatusCode, body: &str, url: &str) -> Error {
    let parsed: ApiError = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or(status.as_u16());
    let detail = if parsed.error.is_empty() {
        body.to_string()
    } else {
        parsed.error
    };

    match code {
        401 | 403 => Error::auth(format!(
            "Invalid authorization key or insufficient permissions. Status: {}",
            code
        )),
        404 => Error::not_found(format!("{} ({})", url, detail)),
        429 => Error::rate_limited(format!("Rate limit exceeded. Status: {}", code)),
        500..=599 => Error::provider(
            API_NAME,
            format!("StrikeTracker server error (transient): {} - {}", code, detail),
        ),
        _ => Error::provider(API_NAME, format!("Request failed: {} - {}", code, detail)),
    }
}

#[async_trait]
impl CdnApi for StrikeTrackerClient {
    async fn get_origin(&self, ctx: &OperationContext, account_hash: &str, id: u64) -> Result<Origin> {
        let url = self.url(account_hash, &format!("/origins/{}", id));
        self.call(ctx, Method::GET, url, None).await
    }

    async fn create_origin(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        origin: &Origin,
    ) -> Result<Origin> {
        let url = self.url(account_hash, "/origins");
        self.call(ctx, Method::POST, url, Some(serde_json::to_value(origin)?))
            .await
    }

    async fn update_origin(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
        origin: &Origin,
    ) -> Result<Origin> {
        let url = self.url(account_hash, &format!("/origins/{}", id));
        self.call(ctx, Method::PUT, url, Some(serde_json::to_value(origin)?))
            .await
    }

    async fn delete_origin(&self, ctx: &OperationContext, account_hash: &str, id: u64) -> Result<()> {
        let url = self.url(account_hash, &format!("/origins/{}", id));
        self.execute(ctx, Method::DELETE, url, None).await.map(|_| ())
    }

    async fn get_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
    ) -> Result<Certificate> {
        let url = self.url(account_hash, &format!("/certificates/{}", id));
        self.call(ctx, Method::GET, url, None).await
    }

    async fn upload_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        certificate: &Certificate,
    ) -> Result<Certificate> {
        let url = self.url(account_hash, "/certificates");
        self.call(ctx, Method::POST, url, Some(serde_json::to_value(certificate)?))
            .await
    }

    async fn update_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
        certificate: &Certificate,
    ) -> Result<Certificate> {
        let url = self.url(account_hash, &format!("/certificates/{}", id));
        self.call(ctx, Method::PUT, url, Some(serde_json::to_value(certificate)?))
            .await
    }

    async fn delete_certificate(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        id: u64,
    ) -> Result<()> {
        let url = self.url(account_hash, &format!("/certificates/{}", id));
        self.execute(ctx, Method::DELETE, url, None).await.map(|_| ())
    }

    async fn get_host(&self, ctx: &OperationContext, account_hash: &str, host_hash: &str) -> Result<Host> {
        let url = self.url(account_hash, &format!("/hosts/{}", host_hash));
        self.call(ctx, Method::GET, url, None).await
    }

    async fn create_host(&self, ctx: &OperationContext, account_hash: &str, host: &Host) -> Result<Host> {
        let url = self.url(account_hash, "/hosts");
        self.call(ctx, Method::POST, url, Some(serde_json::to_value(host)?))
            .await
    }

    async fn update_host(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        host: &Host,
    ) -> Result<Host> {
        let url = self.url(account_hash, &format!("/hosts/{}", host_hash));
        self.call(ctx, Method::PUT, url, Some(serde_json::to_value(host)?))
            .await
    }

    async fn delete_host(&self, ctx: &OperationContext, account_hash: &str, host_hash: &str) -> Result<()> {
        let url = self.url(account_hash, &format!("/hosts/{}", host_hash));
        self.execute(ctx, Method::DELETE, url, None).await.map(|_| ())
    }

    async fn get_configuration(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
    ) -> Result<Configuration> {
        let url = self.url(
            account_hash,
            &format!("/hosts/{}/configuration/{}", host_hash, scope_id),
        );
        self.call(ctx, Method::GET, url, None).await
    }

    async fn create_scope(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope: &ScopeCreate,
    ) -> Result<Configuration> {
        let url = self.url(
            account_hash,
            &format!("/hosts/{}/configuration/scopes", host_hash),
        );
        self.call(ctx, Method::POST, url, Some(serde_json::to_value(scope)?))
            .await
    }

    async fn update_configuration(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
        configuration: &Configuration,
    ) -> Result<Configuration> {
        let url = self.url(
            account_hash,
            &format!("/hosts/{}/configuration/{}", host_hash, scope_id),
        );
        self.call(ctx, Method::PUT, url, Some(serde_json::to_value(configuration)?))
            .await
    }

    async fn delete_scope(
        &self,
        ctx: &OperationContext,
        account_hash: &str,
        host_hash: &str,
        scope_id: u64,
    ) -> Result<()> {
        let url = self.url(
            account_hash,
            &format!("/hosts/{}/configuration/{}", host_hash, scope_id),
        );
        self.execute(ctx, Method::DELETE, url, None).await.map(|_| ())
    }

    fn api_name(&self) -> &'static str {
        API_NAME
    }
}
