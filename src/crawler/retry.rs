//! Exponential backoff for transient failures
//!
//! | Condition            | Action                                  |
//! |----------------------|-----------------------------------------|
//! | Transient failure    | Sleep `base^k` units, retry (k = 1..=max) |
//! | Transient, budget spent | Give up with [`RetryError::Exhausted`] |
//! | Anything else        | Give up at once with [`RetryError::Permanent`] |

use crate::config::RetryConfig;
use crate::crawler::progress::ProgressSink;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Classifies an error as worth retrying
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Outcome of an operation that could not be completed
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every allowed retry failed; holds the last error
    #[error("gave up after {retries} retries: {source}")]
    Exhausted { retries: u32, source: E },

    /// The operation failed with a non-transient error
    #[error(transparent)]
    Permanent(E),
}

/// Backoff schedule: retry `k` sleeps `unit * base^k`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,

    /// Exponential base
    pub base: u64,

    /// Length of one backoff unit
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base: 5,
            unit: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base: config.base,
            unit: Duration::from_millis(config.unit_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-indexed)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.base.saturating_pow(retry);
        u32::try_from(factor)
            .ok()
            .and_then(|factor| self.unit.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Runs `op` until it succeeds, fails permanently, or the retry budget is spent
    ///
    /// Before each sleep a note is written to `sink` with the attempt number,
    /// the retry budget, and the sleep length.
    pub async fn execute<T, E, F, Fut>(
        &self,
        sink: &dyn ProgressSink,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + fmt::Display,
    {
        let mut retries = 0;

        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(RetryError::Permanent(err));
            }

            if retries >= self.max_retries {
                return Err(RetryError::Exhausted {
                    retries,
                    source: err,
                });
            }

            retries += 1;
            let delay = self.delay_for(retries);
            tracing::debug!("Transient failure: {}", err);
            sink.note(&format!(
                "Retry attempt: {} of {}. Sleep period: {}.",
                retries,
                self.max_retries,
                format_delay(delay)
            ));
            tokio::time::sleep(delay).await;
        }
    }
}

fn format_delay(delay: Duration) -> String {
    if delay.subsec_nanos() == 0 {
        format!("{} seconds", delay.as_secs())
    } else {
        format!("{} ms", delay.as_millis())
    }
}
