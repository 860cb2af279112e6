// # terraform-provider-striketracker
//
// Thin entry point. Everything the provider does lives in
// `striketracker-core`; the HTTP side lives in `striketracker-client`.
//
// The binary:
// 1. Reads provider configuration from environment variables
// 2. Initializes tracing on stderr
// 3. Reads one `ProviderRequest` (JSON) from stdin
// 4. Dispatches it and writes one `ProviderResponse` (JSON) to stdout
//
// ## Configuration
//
// - `AUTHORIZATIONHEADERKEY`: StrikeTracker API token (required)
// - `APPLICATIONID`: value of the `X-Application-Id` header
// - `STRIKETRACKER_API_BASE`: API endpoint
// - `STRIKETRACKER_REQUEST_TIMEOUT_SECS`: per-request timeout (1-300)
// - `STRIKETRACKER_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export AUTHORIZATIONHEADERKEY=your_token
// echo '{"resource":"striketracker_host","operation":"import","id":"a1b2c3/y7k8p9m2"}' \
//   | terraform-provider-striketracker
// ```

use std::env;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use striketracker_client::StrikeTrackerClient;
use striketracker_core::{ProviderConfig, ProviderRequest, ProviderResponse, StrikeTrackerProvider};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Environment variable selecting the log level
const ENV_LOG_LEVEL: &str = "STRIKETRACKER_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// - 0: Request handled
/// - 1: Configuration error (provider settings, malformed request, bad
///   resource configuration)
/// - 2: Runtime error (remote API, transport, unexpected failure)
#[derive(Debug, Clone, Copy)]
enum PluginExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<PluginExitCode> for ExitCode {
    fn from(code: PluginExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            ENV_LOG_LEVEL,
            raw
        ),
    }
}

fn read_request() -> Result<ProviderRequest> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;
    serde_json::from_str(&input).context("Malformed provider request")
}

fn write_json(value: &serde_json::Value) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, value).context("Failed to write response")?;
    writeln!(stdout).context("Failed to write response")?;
    Ok(())
}

fn write_response(response: &ProviderResponse) -> Result<()> {
    write_json(&serde_json::to_value(response)?)
}

fn write_error(message: &str) {
    if let Err(e) = write_json(&serde_json::json!({ "error": message })) {
        eprintln!("{}", e);
    }
}

fn main() -> ExitCode {
    let log_level = env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string());
    let log_level = match parse_log_level(&log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            write_error(&e.to_string());
            return PluginExitCode::ConfigError.into();
        }
    };

    // Stdout carries the response
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PluginExitCode::ConfigError.into();
    }

    let config = match ProviderConfig::from_env().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            write_error(&e.to_string());
            return PluginExitCode::ConfigError.into();
        }
    };

    let request = match read_request() {
        Ok(request) => request,
        Err(e) => {
            error!("{:#}", e);
            write_error(&format!("{:#}", e));
            return PluginExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PluginExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(config, request)).into()
}

async fn run(config: ProviderConfig, request: ProviderRequest) -> PluginExitCode {
    let client = match StrikeTrackerClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            write_error(&e.to_string());
            return PluginExitCode::ConfigError;
        }
    };
    let provider = StrikeTrackerProvider::new(Arc::new(client), &config);

    info!("{} {}", request.operation, request.resource);
    match provider.dispatch(request).await {
        Ok(response) => match write_response(&response) {
            Ok(()) => PluginExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                PluginExitCode::RuntimeError
            }
        },
        Err(e) => {
            error!("{}", e);
            write_error(&e.to_string());
            if e.is_configuration() {
                PluginExitCode::ConfigError
            } else {
                PluginExitCode::RuntimeError
            }
        }
    }
}
