//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables once at startup.

use std::env;

use tracing::warn;
use url::Url;

/// Default base URL for the logging backend API.
const DEFAULT_LOG_ENDPOINT: &str = "https://logging.googleapis.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project/account identifier for the logging backend
    pub project_id: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Base URL of the logging backend API
    pub log_endpoint: Url,

    /// Optional bearer token for the logging backend
    pub log_api_token: Option<String>,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            project_id: env::var("PROJECT_ID").unwrap_or_default(),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            log_endpoint: parse_url("LOG_ENDPOINT", DEFAULT_LOG_ENDPOINT),

            log_api_token: env::var("LOG_API_TOKEN").ok(),

            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }
}

/// Parse a URL from an environment variable, falling back to a default.
///
/// The default is a compile-time constant and must always parse.
fn parse_url(name: &str, default: &str) -> Url {
    let fallback = || Url::parse(default).unwrap();

    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return fallback(),
    };

    match Url::parse(&raw) {
        Ok(url) => url,
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "Invalid URL, using default");
            fallback()
        }
    }
}
