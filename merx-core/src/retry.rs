use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for bounded exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the first failure.
    pub max_redeliveries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Hard cap on any single delay.
    pub max_delay: Duration,
    /// Factor applied to the delay after each retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_redeliveries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

/// Explicit retry state for one attempt sequence: attempt counter plus the
/// delay to apply before the next retry. Ephemeral, never persisted.
///
/// The state itself never sleeps; the owner of the sequence decides how to
/// wait out each delay.
#[derive(Debug)]
pub struct RetryState {
    config: RetryConfig,
    attempt: u32,
    next_delay: Duration,
}

impl RetryState {
    pub fn new(config: RetryConfig) -> Self {
        let next_delay = config.initial_delay.min(config.max_delay);
        Self {
            config,
            attempt: 0,
            next_delay,
        }
    }

    /// Retries consumed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Whether another retry is permitted.
    pub fn can_retry(&self) -> bool {
        self.attempt < self.config.max_redeliveries
    }

    /// Consume one retry, returning the delay to wait before it.
    /// Returns `None` once redeliveries are exhausted.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if !self.can_retry() {
            return None;
        }
        self.attempt += 1;
        let delay = self.next_delay;
        self.next_delay = Duration::from_secs_f64(
            (self.next_delay.as_secs_f64() * self.config.backoff_multiplier)
                .min(self.config.max_delay.as_secs_f64()),
        );
        Some(delay)
    }
}
