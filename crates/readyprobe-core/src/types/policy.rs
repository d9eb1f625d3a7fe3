//! Retry policy types
//!
//! A [`RetryPolicy`] is validated once, when it is built, and never changes
//! afterwards. Configuration files deserialize into [`RetryPolicyConfig`]
//! and are converted through [`TryFrom`], so an invalid policy is rejected
//! before any probe runs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay strategy applied between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RetryStrategy {
    /// Retry immediately
    None,

    /// Same delay between every pair of attempts (default)
    #[default]
    FixedDelay,

    /// Delay multiplied by `backoff-multiplier` after every attempt
    ExponentialBackoff,

    /// Delay grows by `delay-ms` after every attempt
    LinearBackoff,
}

/// Raw, unvalidated retry policy as it appears in configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicyConfig {
    /// Number of attempts inside the retry budget
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay strategy
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Base delay in milliseconds
    #[serde(default = "default_delay")]
    pub delay_ms: u64,

    /// Backoff multiplier for exponential strategies
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound for exponential and linear delays, in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Optional bound on a single attempt, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: RetryStrategy::default(),
            delay_ms: default_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay(),
            attempt_timeout_ms: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_delay() -> u64 {
    1000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_max_delay() -> u64 {
    30000
}

/// Validated, immutable retry policy
///
/// `max_attempts` counts the attempts inside the retry budget. Pollers that
/// perform an unconditional final attempt after exhausting the budget make
/// at most `max_attempts + 1` invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RetryPolicyConfig", into = "RetryPolicyConfig")]
pub struct RetryPolicy {
    max_attempts: u32,
    strategy: RetryStrategy,
    delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    /// Build a fixed-delay policy
    ///
    /// # Example
    ///
    /// ```rust
    /// use readyprobe_core::types::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::fixed(3, Duration::from_millis(100)).unwrap();
    /// assert_eq!(policy.max_attempts(), 3);
    ///
    /// assert!(RetryPolicy::fixed(0, Duration::ZERO).is_err());
    /// ```
    pub fn fixed(max_attempts: u32, delay: Duration) -> Result<Self> {
        Self::try_from(RetryPolicyConfig {
            max_attempts,
            strategy: RetryStrategy::FixedDelay,
            delay_ms: duration_ms(delay),
            ..RetryPolicyConfig::default()
        })
    }

    /// Return a copy of this policy with a per-attempt timeout
    pub fn with_attempt_timeout(self, timeout: Duration) -> Result<Self> {
        let mut config = RetryPolicyConfig::from(self);
        config.attempt_timeout_ms = Some(duration_ms(timeout));
        Self::try_from(config)
    }

    /// Number of attempts inside the retry budget
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay strategy
    pub fn strategy(&self) -> RetryStrategy {
        self.strategy
    }

    /// Base delay between attempts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Backoff multiplier used by the exponential strategy
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Cap applied to exponential and linear delays
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Bound on a single attempt, if any
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let config = RetryPolicyConfig::default();
        Self {
            max_attempts: config.max_attempts,
            strategy: config.strategy,
            delay: Duration::from_millis(config.delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
            attempt_timeout: None,
        }
    }
}

impl TryFrom<RetryPolicyConfig> for RetryPolicy {
    type Error = Error;

    fn try_from(config: RetryPolicyConfig) -> Result<Self> {
        if config.max_attempts < 1 {
            return Err(Error::invalid_policy("max-attempts must be at least 1"));
        }

        // The final unconditional attempt is numbered max_attempts + 1
        if config.max_attempts == u32::MAX {
            return Err(Error::invalid_policy(format!(
                "max-attempts must be below {}",
                u32::MAX
            )));
        }

        if !config.backoff_multiplier.is_finite() || config.backoff_multiplier < 1.0 {
            return Err(Error::invalid_policy(format!(
                "backoff-multiplier must be a finite number >= 1.0, got {}",
                config.backoff_multiplier
            )));
        }

        if config.attempt_timeout_ms == Some(0) {
            return Err(Error::invalid_policy(
                "attempt-timeout-ms must be greater than 0 when set",
            ));
        }

        Ok(Self {
            max_attempts: config.max_attempts,
            strategy: config.strategy,
            delay: Duration::from_millis(config.delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
            attempt_timeout: config.attempt_timeout_ms.map(Duration::from_millis),
        })
    }
}

impl From<RetryPolicy> for RetryPolicyConfig {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            strategy: policy.strategy,
            delay_ms: duration_ms(policy.delay),
            backoff_multiplier: policy.backoff_multiplier,
            max_delay_ms: duration_ms(policy.max_delay),
            attempt_timeout_ms: policy.attempt_timeout.map(duration_ms),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.strategy(), RetryStrategy::FixedDelay);
        assert_eq!(policy.delay(), Duration::from_millis(1000));
        assert_eq!(policy.attempt_timeout(), None);
    }

    #[test]
    fn test_fixed_policy() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(250)).unwrap();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.strategy(), RetryStrategy::FixedDelay);
        assert_eq!(policy.delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_fixed_policy_keeps_long_delays_uncapped() {
        let policy = RetryPolicy::fixed(2, Duration::from_secs(60)).unwrap();
        assert_eq!(policy.max_delay(), Duration::from_secs(30));
        assert_eq!(
            crate::retry::calculate_delay(&policy, 1, false),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = RetryPolicy::fixed(0, Duration::from_millis(10)).unwrap_err();
        assert!(err.is_invalid_policy());
        assert!(err.to_string().contains("max-attempts"));
    }

    #[test]
    fn test_max_attempts_leaves_room_for_final_attempt() {
        let err = RetryPolicy::fixed(u32::MAX, Duration::ZERO).unwrap_err();
        assert!(err.is_invalid_policy());

        let policy = RetryPolicy::fixed(u32::MAX - 1, Duration::ZERO).unwrap();
        assert_eq!(policy.max_attempts(), u32::MAX - 1);
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let config = RetryPolicyConfig {
            backoff_multiplier: 0.5,
            ..RetryPolicyConfig::default()
        };
        assert!(RetryPolicy::try_from(config).unwrap_err().is_invalid_policy());

        let config = RetryPolicyConfig {
            backoff_multiplier: f64::NAN,
            ..RetryPolicyConfig::default()
        };
        assert!(RetryPolicy::try_from(config).is_err());
    }

    #[test]
    fn test_attempt_timeout() {
        let policy = RetryPolicy::default()
            .with_attempt_timeout(Duration::from_millis(500))
            .unwrap();
        assert_eq!(policy.attempt_timeout(), Some(Duration::from_millis(500)));

        assert!(RetryPolicy::default()
            .with_attempt_timeout(Duration::ZERO)
            .is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let yaml = "max-attempts: 4\nstrategy: linear-backoff\ndelay-ms: 20\n";
        let policy: RetryPolicy = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.strategy(), RetryStrategy::LinearBackoff);
        assert_eq!(policy.delay(), Duration::from_millis(20));

        let invalid: std::result::Result<RetryPolicy, _> =
            serde_yaml_ng::from_str("max-attempts: 0\n");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_negative_delay_rejected_by_deserialization() {
        let invalid: std::result::Result<RetryPolicy, _> =
            serde_yaml_ng::from_str("max-attempts: 2\ndelay-ms: -100\n");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_serialize_kebab_case() {
        let policy = RetryPolicy::fixed(2, Duration::from_millis(100)).unwrap();
        let yaml = serde_yaml_ng::to_string(&policy).unwrap();
        assert!(yaml.contains("max-attempts: 2"));
        assert!(yaml.contains("strategy: fixed-delay"));
        assert!(yaml.contains("delay-ms: 100"));
        assert!(!yaml.contains("attempt-timeout-ms"));
    }
}
