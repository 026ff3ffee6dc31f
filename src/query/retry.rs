//! Exponential backoff for retryable failures.

use std::future::Future;
use std::time::Duration;

use super::QueryConfig;
use crate::errors::ClientResult;

/// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped.
pub fn retry_delay(config: &QueryConfig, attempt: u32) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| config.retry_base_delay.checked_mul(factor))
        .map_or(config.retry_max_delay, |delay| delay.min(config.retry_max_delay))
}

/// Run `operation`, retrying retryable errors up to `config.retry` times.
pub async fn with_retry<T, F, Fut>(config: &QueryConfig, key: &str, mut operation: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.retry => {
                let delay = retry_delay(config, attempt);
                tracing::warn!(
                    key,
                    attempt = attempt + 1,
                    max_retries = config.retry,
                    delay_ms = delay.as_millis() as u64,
                    "Query failed, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(retry: u32) -> QueryConfig {
        QueryConfig {
            retry,
            retry_base_delay: Duration::from_millis(1),
            retry_max_delay: Duration::from_millis(4),
            ..Default::default()
        }
    }

    fn server_error() -> ClientError {
        ClientError::Api {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "down".to_string(),
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = QueryConfig::default();
        assert_eq!(retry_delay(&config, 0), Duration::from_secs(1));
        assert_eq!(retry_delay(&config, 1), Duration::from_secs(2));
        assert_eq!(retry_delay(&config, 4), Duration::from_secs(16));
        assert_eq!(retry_delay(&config, 5), Duration::from_secs(30));
        assert_eq!(retry_delay(&config, 40), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_config(3), "k", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry_budget() {
        let calls = AtomicU32::new(0);
        let result: ClientResult<()> = with_retry(&fast_config(2), "k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: ClientResult<()> = with_retry(&fast_config(5), "k", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ClientError::Api {
                    status: StatusCode::BAD_REQUEST,
                    message: "bad".to_string(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
