//! Exponential backoff schedule for the notification client.
//!
//! Attempt 1 runs immediately.  Before attempt `n + 1` the caller waits
//! `base · 2^(n-1)`, capped at `max_delay`:
//!
//! ```text
//!   attempt   1    2    3    4    5
//!   wait      -    1s   2s   4s   8s
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Wait before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single wait, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based),
    /// or `None` if no further attempt is allowed.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Some(Duration::from_millis(ms))
    }

    /// The full list of inter-attempt waits for an exhausted run.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .filter_map(|a| self.delay_after(a))
            .collect()
    }
}
