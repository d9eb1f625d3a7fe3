//! Delay strategies and success predicates
//!
//! A poll is steered by two things: how long to wait after an attempt that did
//! not succeed ([`calculate_delay`]) and what counts as success
//! ([`SuccessPredicate`]).

use crate::types::{RetryPolicy, RetryStrategy};
use rand::Rng;
use std::time::Duration;

/// Calculate the delay after a failed attempt
///
/// `attempt` is 1-indexed and names the attempt that just failed. The
/// `max-delay-ms` cap bounds the growing strategies only; a fixed delay is
/// always waited in full.
///
/// # Example
///
/// ```rust
/// use readyprobe_core::retry::calculate_delay;
/// use readyprobe_core::types::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::fixed(3, Duration::from_millis(100)).unwrap();
///
/// assert_eq!(calculate_delay(&policy, 1, false), Duration::from_millis(100));
/// assert_eq!(calculate_delay(&policy, 3, false), Duration::from_millis(100));
/// ```
pub fn calculate_delay(policy: &RetryPolicy, attempt: u32, jitter: bool) -> Duration {
    let attempt_index = attempt.saturating_sub(1);
    let base_ms = policy.delay().as_millis() as f64;

    let max_ms = policy.max_delay().as_millis() as u64;

    // f64 -> u64 saturates, so huge exponents land on the cap
    let capped_ms = match policy.strategy() {
        RetryStrategy::None => 0,

        RetryStrategy::FixedDelay => base_ms as u64,

        RetryStrategy::ExponentialBackoff => {
            let grown = base_ms * policy.backoff_multiplier().powf(attempt_index as f64);
            (grown as u64).min(max_ms)
        }

        RetryStrategy::LinearBackoff => {
            let grown = base_ms * (attempt_index as f64 + 1.0);
            (grown as u64).min(max_ms)
        }
    };

    // Up to 25% extra
    let final_ms = if jitter && capped_ms > 0 {
        let jitter_range = capped_ms / 4;
        capped_ms + rand::rng().random_range(0..=jitter_range)
    } else {
        capped_ms
    };

    Duration::from_millis(final_ms)
}

/// Decides whether an observation ends the poll
///
/// # Example
///
/// ```rust
/// use readyprobe_core::retry::{Equals, SuccessPredicate};
///
/// let healthy = Equals(200u16);
/// assert!(healthy.is_success(&200));
/// assert!(!healthy.is_success(&503));
/// ```
pub trait SuccessPredicate<T: ?Sized>: Send + Sync {
    fn is_success(&self, observation: &T) -> bool;
}

/// Success when the observation equals the wrapped value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equals<T>(pub T);

impl<T> SuccessPredicate<T> for Equals<T>
where
    T: PartialEq + Send + Sync,
{
    fn is_success(&self, observation: &T) -> bool {
        *observation == self.0
    }
}

/// A predicate that uses a closure
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<T, F> SuccessPredicate<T> for ClosurePredicate<F>
where
    T: ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_success(&self, observation: &T) -> bool {
        (self.predicate)(observation)
    }
}

impl<T: ?Sized, P: SuccessPredicate<T> + ?Sized> SuccessPredicate<T> for &P {
    fn is_success(&self, observation: &T) -> bool {
        (**self).is_success(observation)
    }
}
