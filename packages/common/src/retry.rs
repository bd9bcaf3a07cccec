use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

/// Bounds for retrying an operation that failed with a transient fault.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Default: 3.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u8,
    /// Delay before the second attempt, in milliseconds. Default: 20.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// Upper bound for any single delay, in milliseconds. Default: 500.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u8 {
    3
}
fn default_base_backoff_ms() -> u64 {
    20
}
fn default_max_backoff_ms() -> u64 {
    500
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u8) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after `attempt` (1-based) failed.
    pub fn backoff(&self, attempt: u8) -> Duration {
        calculate_backoff(attempt, self.base_backoff_ms, self.max_backoff_ms)
    }
}

/// Calculate exponential backoff delay with jitter.
///
/// Formula: `min(base_ms * 2^(attempt-1) + jitter, max_ms)` (0-25% jitter)
pub fn calculate_backoff(attempt: u8, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exp_factor = 2u64.saturating_pow((attempt - 1) as u32);
    let delay_ms = base_ms.saturating_mul(exp_factor);

    let jitter = if delay_ms > 0 {
        rand::rng().random_range(0..=delay_ms / 4)
    } else {
        0
    };

    let total_delay = delay_ms.saturating_add(jitter).min(max_ms);
    Duration::from_millis(total_delay)
}
