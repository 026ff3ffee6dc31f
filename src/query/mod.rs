//! Query layer: cached reads with retry, and error surfacing.
//!
//! The API wrappers never retry; callers that want backoff and caching go
//! through a [`QueryClient`] built from an explicit [`QueryConfig`].

mod retry;

pub use retry::*;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::api::QueryParams;
use crate::errors::{ClientError, ClientResult};

/// Shared defaults for cached queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Extra attempts after the first failure
    pub retry: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    /// How long a cached response is served without refetching
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            retry: 3,
            retry_base_delay: Duration::from_millis(1000),
            retry_max_delay: Duration::from_millis(30_000),
            stale_time: Duration::from_secs(5 * 60),
        }
    }
}

/// Where final query failures are surfaced (a toast in the app).
pub trait ErrorReporter: Send + Sync {
    fn report(&self, key: &str, error: &ClientError);
}

/// Default reporter: log the failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, key: &str, error: &ClientError) {
        tracing::error!(key, code = error.error_code(), "Query failed: {}", error);
    }
}

/// Cache key for a resource plus its filters.
pub fn query_key(resource: &str, params: &QueryParams) -> String {
    params.apply(resource)
}

struct CacheEntry {
    value: serde_json::Value,
    fetched_at: Instant,
}

/// Caching, retrying front for API reads.
pub struct QueryClient {
    config: QueryConfig,
    cache: RwLock<HashMap<String, CacheEntry>>,
    reporter: Arc<dyn ErrorReporter>,
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self::with_reporter(config, Arc::new(LogReporter))
    }

    pub fn with_reporter(config: QueryConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
            reporter,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Serve `key` from cache while fresh, otherwise fetch with retry.
    ///
    /// Only successful results are cached, and stale entries are pruned on
    /// each insert. A final failure is reported once and returned to the
    /// caller.
    pub async fn fetch<T, F, Fut>(&self, key: &str, fetcher: F) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(value) = self.cached(key).await {
            return Ok(value);
        }

        match with_retry(&self.config, key, fetcher).await {
            Ok(value) => {
                match serde_json::to_value(&value) {
                    Ok(json) => {
                        let mut cache = self.cache.write().await;
                        let stale_time = self.config.stale_time;
                        cache.retain(|_, entry| entry.fetched_at.elapsed() < stale_time);
                        cache.insert(
                            key.to_string(),
                            CacheEntry {
                                value: json,
                                fetched_at: Instant::now(),
                            },
                        );
                    }
                    Err(e) => tracing::warn!(key, "Query result not cacheable: {}", e),
                }
                Ok(value)
            }
            Err(e) => {
                self.reporter.report(key, &e);
                Err(e)
            }
        }
    }

    /// Run a write once, reporting failure; on success drop cached entries
    /// under each prefix in `invalidates`.
    pub async fn mutate<T, Fut>(&self, key: &str, operation: Fut, invalidates: &[&str]) -> ClientResult<T>
    where
        Fut: Future<Output = ClientResult<T>>,
    {
        match operation.await {
            Ok(value) => {
                for prefix in invalidates {
                    self.invalidate(prefix).await;
                }
                Ok(value)
            }
            Err(e) => {
                self.reporter.report(key, &e);
                Err(e)
            }
        }
    }

    /// Fresh cached value for `key`, if any.
    pub async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cache = self.cache.read().await;
        let entry = cache.get(key)?;
        if entry.fetched_at.elapsed() >= self.config.stale_time {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Drop every entry whose key starts with `prefix`.
    pub async fn invalidate(&self, prefix: &str) -> usize {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|key, _| !key.starts_with(prefix));
        let removed = before - cache.len();
        tracing::debug!(prefix, removed, "Invalidated queries");
        removed
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}
