//! Bounded retry with exponential backoff for content fetches.
//!
//! The schedule lives in [`RetryPolicy`] so tests can assert timing without
//! real delays (the loop itself runs under paused tokio time in tests).

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{ContentError, Result};

/// Max fetch attempts against the content API.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry following the given zero-based failed
    /// attempt: `base * 2^attempt` (1s, 2s with defaults). Saturates
    /// instead of overflowing for large attempt counts.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Run `attempt_fn` until it succeeds or the policy is exhausted, sleeping
/// the policy's backoff between failures. Never returns partial data: the
/// terminal error carries the attempt count and the last failure.
pub async fn fetch_with_retry<T, F, Fut>(policy: &RetryPolicy, mut attempt_fn: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last: Option<ContentError> = None;

    for attempt in 0..policy.max_attempts {
        match attempt_fn(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(attempt = attempt + 1, error = %err, "Content fetch attempt failed");
                if attempt + 1 < policy.max_attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
                last = Some(err);
            }
        }
    }

    Err(ContentError::RetriesExhausted {
        attempts: policy.max_attempts,
        last: last
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts were made".to_string()),
    })
}
