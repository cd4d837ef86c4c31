//! Backoff policy for failed seal attempts.
//!
//! A failed seal leaves no state behind, so re-running the whole attempt is
//! always safe; the strategy only decides how long to wait between runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// No delay between retries
    None,
    /// Fixed delay between retries
    Fixed { delay_secs: u64 },
    /// Exponential backoff
    Exponential {
        initial_delay_secs: u64,
        max_delay_secs: u64,
        multiplier: f64,
    },
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::Fixed { delay_secs: 1 }
    }
}

impl RetryStrategy {
    /// Calculate delay for attempt number (first attempt is 1)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            RetryStrategy::None => Duration::ZERO,
            RetryStrategy::Fixed { delay_secs } => Duration::from_secs(*delay_secs),
            RetryStrategy::Exponential {
                initial_delay_secs,
                max_delay_secs,
                multiplier,
            } => {
                let delay = (*initial_delay_secs as f64) * multiplier.powi(attempt as i32 - 1);
                let delay = delay.min(*max_delay_secs as f64);
                Duration::from_secs(delay as u64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_strategy_none() {
        let strategy = RetryStrategy::None;
        assert_eq!(strategy.delay_for_attempt(1), Duration::ZERO);
        assert_eq!(strategy.delay_for_attempt(7), Duration::ZERO);
    }

    #[test]
    fn test_retry_strategy_fixed() {
        let strategy = RetryStrategy::Fixed { delay_secs: 2 };
        assert_eq!(strategy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(strategy.delay_for_attempt(5), Duration::from_secs(2));
    }

    #[test]
    fn test_retry_strategy_exponential() {
        let strategy = RetryStrategy::Exponential {
            initial_delay_secs: 1,
            max_delay_secs: 8,
            multiplier: 2.0,
        };

        assert_eq!(strategy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(strategy.delay_for_attempt(10), Duration::from_secs(8)); // Capped at max
    }
}
