//! Ledger configuration.
//!
//! Supports loading from environment variables with the QWL_ prefix.

use serde::{Deserialize, Serialize};
use std::env;

use crate::retry::RetryStrategy;

/// Batch boundary policy: when does the pending set get sealed?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealPolicy {
    /// Seal whenever the pending count reaches the threshold
    TxCount { threshold: usize },
    /// Seal on every call with a non-empty pending set
    EveryCall,
}

impl SealPolicy {
    /// Whether a pending set of this size is at the batch boundary
    ///
    /// An empty pending set is never at the boundary; empty blocks are
    /// never sealed.
    pub fn should_seal(&self, pending_count: usize) -> bool {
        if pending_count == 0 {
            return false;
        }
        match self {
            SealPolicy::TxCount { threshold } => pending_count >= *threshold,
            SealPolicy::EveryCall => true,
        }
    }
}

impl Default for SealPolicy {
    fn default() -> Self {
        Self::TxCount {
            threshold: default_seal_threshold(),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Batch boundary policy
    #[serde(default)]
    pub seal_policy: SealPolicy,
    /// Maximum seal attempts before surfacing the failure
    #[serde(default = "default_max_seal_attempts")]
    pub max_seal_attempts: u32,
    /// Backoff between failed seal attempts
    #[serde(default)]
    pub seal_retry: RetryStrategy,
}

fn default_seal_threshold() -> usize {
    3
}

fn default_max_seal_attempts() -> u32 {
    3
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            seal_policy: SealPolicy::default(),
            max_seal_attempts: default_max_seal_attempts(),
            seal_retry: RetryStrategy::default(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - QWL_SEAL_THRESHOLD: pending-count batch boundary (default 3)
    /// - QWL_MAX_SEAL_ATTEMPTS: seal attempts before giving up (default 3)
    /// - QWL_SEAL_RETRY_DELAY: fixed delay between attempts in seconds
    ///   (0 disables the delay)
    pub fn from_env() -> Self {
        let threshold = env::var("QWL_SEAL_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_seal_threshold);

        let seal_retry = match env::var("QWL_SEAL_RETRY_DELAY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            Some(0) => RetryStrategy::None,
            Some(delay_secs) => RetryStrategy::Fixed { delay_secs },
            None => RetryStrategy::default(),
        };

        Self {
            seal_policy: SealPolicy::TxCount { threshold },
            max_seal_attempts: env::var("QWL_MAX_SEAL_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_seal_attempts),
            seal_retry,
        }
    }

    /// Create a development configuration (no backoff between attempts)
    pub fn development() -> Self {
        Self {
            seal_policy: SealPolicy::default(),
            max_seal_attempts: 3,
            seal_retry: RetryStrategy::None,
        }
    }

    /// Replace the batch boundary policy
    pub fn with_policy(mut self, policy: SealPolicy) -> Self {
        self.seal_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.seal_policy, SealPolicy::TxCount { threshold: 3 });
        assert_eq!(config.max_seal_attempts, 3);
        assert_eq!(config.seal_retry, RetryStrategy::Fixed { delay_secs: 1 });
    }

    #[test]
    fn test_development_preset() {
        let config = LedgerConfig::development();
        assert_eq!(config.seal_retry, RetryStrategy::None);
    }

    #[test]
    fn test_tx_count_boundary() {
        let policy = SealPolicy::TxCount { threshold: 3 };
        assert!(!policy.should_seal(0));
        assert!(!policy.should_seal(2));
        assert!(policy.should_seal(3));
        assert!(policy.should_seal(5));
    }

    #[test]
    fn test_every_call_never_seals_empty() {
        let policy = SealPolicy::EveryCall;
        assert!(!policy.should_seal(0));
        assert!(policy.should_seal(1));
    }

    #[test]
    fn test_with_policy() {
        let config =
            LedgerConfig::development().with_policy(SealPolicy::TxCount { threshold: 10 });
        assert_eq!(config.seal_policy, SealPolicy::TxCount { threshold: 10 });
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: LedgerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.seal_policy, SealPolicy::TxCount { threshold: 3 });
        assert_eq!(config.max_seal_attempts, 3);
    }
}
