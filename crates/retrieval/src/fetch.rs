//! Retrying record fetch

use datagov_config::FetchConfig;
use datagov_core::{FetchError, FetchRequest, RecordPage, RecordSource};
use std::time::Duration;

/// Bounded retry policy for upstream fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }
}

/// Run `request` against `source`, retrying forbidden and transient
/// failures with a fixed backoff. Not-found and API errors fail at once.
pub async fn fetch_with_retry(
    source: &dyn RecordSource,
    request: &FetchRequest,
    policy: RetryPolicy,
) -> Result<RecordPage, FetchError> {
    let mut attempt = 0u32;
    loop {
        match source.search(request).await {
            Ok(page) => return Ok(page),
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                tracing::warn!(
                    source = source.name(),
                    resource_id = %request.resource_id,
                    attempt,
                    error = %err,
                    "Fetch failed, retrying"
                );
                tokio::time::sleep(policy.backoff).await;
            }
            Err(err) => {
                tracing::warn!(
                    source = source.name(),
                    resource_id = %request.resource_id,
                    attempts = attempt + 1,
                    error = %err,
                    "Fetch failed"
                );
                return Err(err);
            }
        }
    }
}
