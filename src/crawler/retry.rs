//! Retry wrapper around page navigation
//!
//! A navigation is attempted `retries + 1` times. Attempt `n` (0-based) runs
//! with `initial_timeout + n * timeout_increment`. Before retry `k` (1-based)
//! the crawl sleeps `backoff_base + k * backoff_step`.

use crate::config::RetryConfig;
use crate::crawler::fetcher::{FetchError, PageFetcher, WaitStrategy};
use std::time::Duration;

/// Retry and backoff tunables for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_timeout: Duration,
    pub retries: u32,
    pub timeout_increment: Duration,
    pub backoff_base: Duration,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            initial_timeout: Duration::from_millis(config.initial_timeout_ms),
            retries: config.retries,
            timeout_increment: Duration::from_millis(config.timeout_increment_ms),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            backoff_step: Duration::from_millis(config.backoff_step_ms),
        }
    }
}

impl RetryPolicy {
    /// Total number of navigation attempts
    pub fn attempts(&self) -> u32 {
        self.retries + 1
    }

    /// Timeout for attempt `attempt` (0-based)
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.initial_timeout + self.timeout_increment * attempt
    }

    /// Sleep before retry number `retry` (1-based)
    pub fn backoff_before(&self, retry: u32) -> Duration {
        self.backoff_base + self.backoff_step * retry
    }
}

/// Navigates to `url`, retrying failed attempts per `policy`
///
/// Returns the error of the last attempt when every attempt failed.
pub async fn navigate_with_retry<F>(
    fetcher: &mut F,
    url: &str,
    wait: WaitStrategy,
    policy: &RetryPolicy,
) -> Result<(), FetchError>
where
    F: PageFetcher + ?Sized,
{
    let mut attempt = 0;
    loop {
        let timeout = policy.timeout_for(attempt);
        match fetcher.navigate(url, wait, timeout).await {
            Ok(()) => {
                if attempt > 0 {
                    tracing::info!("Loaded {} on attempt {}", url, attempt + 1);
                }
                return Ok(());
            }
            Err(e) if attempt < policy.retries => {
                attempt += 1;
                let backoff = policy.backoff_before(attempt);
                tracing::warn!(
                    "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                    attempt,
                    policy.attempts(),
                    url,
                    e,
                    backoff
                );
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    url,
                    policy.attempts(),
                    e
                );
                return Err(e);
            }
        }
    }
}
