//! Bounded retry policy.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::fmt::Display;
use std::time::Duration;
use tracing::{error, warn};

/// Timeout and retry budget of one class of correlated calls.
///
/// `retries` counts additional attempts: a policy with `retries = 3` makes
/// at most four attempts.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_ms")]
    pub timeout: Duration,
    pub retries: u32,
}

impl RetryPolicy {
    /// Policy of ordinary requests: 10 s per attempt, 3 retries.
    pub const DEFAULT: RetryPolicy = RetryPolicy {
        timeout: Duration::from_secs(10),
        retries: 3,
    };

    /// Policy of a radio reset: 15 s per attempt, 5 retries.
    pub const RESET: RetryPolicy = RetryPolicy {
        timeout: Duration::from_secs(15),
        retries: 5,
    };

    pub const fn new(timeout: Duration, retries: u32) -> Self {
        Self { timeout, retries }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Remaining retries of one retried operation.
///
/// Drive it from an explicit loop:
///
/// ```ignore
/// let mut budget = RetryBudget::new("node_descriptor", policy.retries);
/// loop {
///     match attempt().await {
///         Ok(value) => return Ok(value),
///         Err(e) if budget.should_retry(&e) => continue,
///         Err(e) => return Err(e),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RetryBudget {
    operation: String,
    retries: u32,
    remaining: u32,
}

impl RetryBudget {
    pub fn new(operation: impl Into<String>, retries: u32) -> Self {
        Self {
            operation: operation.into(),
            retries,
            remaining: retries,
        }
    }

    /// Record a failed attempt and decide whether to try again.
    ///
    /// Logs every failure; the final one at error level.
    pub fn should_retry<E: Display>(&mut self, error: &E) -> bool {
        if self.remaining > 0 {
            warn!(
                operation = %self.operation,
                retries_left = self.remaining,
                error = %error,
                "Attempt failed, retrying"
            );
            self.remaining -= 1;
            true
        } else {
            error!(
                operation = %self.operation,
                attempts = self.retries + 1,
                error = %error,
                "All attempts failed"
            );
            false
        }
    }

    /// Attempts that have failed so far.
    pub fn failures(&self) -> u32 {
        self.retries - self.remaining
    }
}
