//! Configuration module for the Patrol client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{ClientError, ClientResult};
use crate::query::QueryConfig;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout for API calls
    pub api_timeout: Duration,
    /// Path to the SQLite file backing local storage
    pub storage_path: PathBuf,
    /// Namespace prefix for every storage key
    pub storage_prefix: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Shared defaults for cached queries
    pub query: QueryConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("PATROL_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string())
            .trim_end_matches('/')
            .to_string();

        let api_timeout = Duration::from_secs(parse_var("PATROL_API_TIMEOUT_SECS", 30)?);

        let storage_path = env::var("PATROL_STORAGE_PATH")
            .unwrap_or_else(|_| "./data/storage.sqlite".to_string())
            .into();

        let storage_prefix =
            env::var("PATROL_STORAGE_PREFIX").unwrap_or_else(|_| "@patrol:".to_string());

        let log_level = env::var("PATROL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = QueryConfig::default();
        let query = QueryConfig {
            retry: parse_var("PATROL_QUERY_RETRY", defaults.retry)?,
            retry_base_delay: Duration::from_millis(parse_var(
                "PATROL_QUERY_RETRY_BASE_MS",
                defaults.retry_base_delay.as_millis() as u64,
            )?),
            retry_max_delay: Duration::from_millis(parse_var(
                "PATROL_QUERY_RETRY_MAX_MS",
                defaults.retry_max_delay.as_millis() as u64,
            )?),
            stale_time: Duration::from_secs(parse_var(
                "PATROL_QUERY_STALE_SECS",
                defaults.stale_time.as_secs(),
            )?),
        };

        Ok(Self {
            api_base_url,
            api_timeout,
            storage_path,
            storage_prefix,
            log_level,
            query,
        })
    }
}

/// Read and parse a variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> ClientResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid {} value: {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}
