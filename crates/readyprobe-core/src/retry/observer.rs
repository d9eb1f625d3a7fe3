//! Poll observation and logging
//!
//! This module provides the `RetryObserver` trait for watching a poll attempt
//! by attempt and a `TracingObserver` implementation that logs every attempt
//! with its expected and actual values using the `tracing` crate.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for poll events
///
/// # Example
///
/// ```rust
/// use readyprobe_core::retry::RetryObserver;
/// use std::fmt::Display;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl RetryObserver for PrintObserver {
///     fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
///         println!("attempt {attempt}/{max_attempts}");
///     }
///
///     fn on_mismatch(&self, attempt: u32, observed: &dyn Display, delay: Duration) {
///         println!("attempt {attempt}: got {observed}, waiting {delay:?}");
///     }
///
///     fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration) {
///         println!("attempt {attempt} failed: {error}, waiting {delay:?}");
///     }
///
///     fn on_success(&self, attempt: u32, total_duration: Duration) {
///         println!("ready after {attempt} attempts ({total_duration:?})");
///     }
///
///     fn on_exhausted(&self, attempts: u32, last: &dyn Display) {
///         println!("gave up after {attempts} attempts, last saw {last}");
///     }
/// }
/// ```
pub trait RetryObserver: Send + Sync {
    /// Called before every attempt inside the retry budget (1-indexed)
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// Called when an attempt observed something that is not a success
    fn on_mismatch(&self, attempt: u32, observed: &dyn fmt::Display, delay: Duration);

    /// Called when an attempt produced no observation at all
    fn on_attempt_failed(&self, attempt: u32, error: &dyn fmt::Display, delay: Duration);

    /// Called when an attempt inside the budget succeeded
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// Called before the unconditional attempt that follows an exhausted budget
    fn on_final_attempt(&self, attempt: u32) {
        let _ = attempt;
    }

    /// Called with whatever the final attempt returned, matching or not
    fn on_exhausted(&self, attempts: u32, last: &dyn fmt::Display);
}

/// A no-op observer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_mismatch(&self, _attempt: u32, _observed: &dyn fmt::Display, _delay: Duration) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn fmt::Display, _delay: Duration) {}

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _last: &dyn fmt::Display) {}
}

/// An observer that logs poll events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_mismatch` / `on_attempt_failed`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_final_attempt`: WARN
/// - `on_exhausted`: ERROR
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being polled
    operation: String,
    /// What the poll is waiting for, logged next to every observation
    expected: Option<String>,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            expected: None,
        }
    }

    /// Log `expected` next to every observed value
    pub fn expecting(mut self, expected: impl fmt::Display) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    fn expected(&self) -> &str {
        self.expected.as_deref().unwrap_or("success")
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("poll")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_mismatch(&self, attempt: u32, observed: &dyn fmt::Display, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            expected = %self.expected(),
            actual = %observed,
            delay_ms = delay.as_millis() as u64,
            "unexpected observation, retrying"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn fmt::Display, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            expected = %self.expected(),
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, retrying"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_final_attempt(&self, attempt: u32) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            "retry budget exhausted, making final attempt"
        );
    }

    fn on_exhausted(&self, attempts: u32, last: &dyn fmt::Display) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            expected = %self.expected(),
            actual = %last,
            "retry budget exhausted, returning final attempt"
        );
    }
}

/// An observer that counts poll events
///
/// Useful for testing and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    pub attempt_starts: AtomicU32,
    pub mismatches: AtomicU32,
    pub failures: AtomicU32,
    pub successes: AtomicU32,
    pub final_attempts: AtomicU32,
    pub exhaustions: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn mismatches(&self) -> u32 {
        self.mismatches.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn final_attempts(&self) -> u32 {
        self.final_attempts.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_mismatch(&self, _attempt: u32, _observed: &dyn fmt::Display, _delay: Duration) {
        self.mismatches.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn fmt::Display, _delay: Duration) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_final_attempt(&self, _attempt: u32) {
        self.final_attempts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _last: &dyn fmt::Display) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_mismatch(&self, attempt: u32, observed: &dyn fmt::Display, delay: Duration) {
        (**self).on_mismatch(attempt, observed, delay)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn fmt::Display, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_final_attempt(&self, attempt: u32) {
        (**self).on_final_attempt(attempt)
    }

    fn on_exhausted(&self, attempts: u32, last: &dyn fmt::Display) {
        (**self).on_exhausted(attempts, last)
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_mismatch(&self, attempt: u32, observed: &dyn fmt::Display, delay: Duration) {
        (**self).on_mismatch(attempt, observed, delay)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn fmt::Display, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_final_attempt(&self, attempt: u32) {
        (**self).on_final_attempt(attempt)
    }

    fn on_exhausted(&self, attempts: u32, last: &dyn fmt::Display) {
        (**self).on_exhausted(attempts, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_observer_counts() {
        let observer = StatsObserver::new();

        observer.on_attempt_start(1, 2);
        observer.on_mismatch(1, &503, Duration::from_millis(10));
        observer.on_attempt_start(2, 2);
        observer.on_attempt_failed(2, &"connection refused", Duration::from_millis(10));
        observer.on_final_attempt(3);
        observer.on_exhausted(3, &503);

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.mismatches(), 1);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.successes(), 0);
        assert_eq!(observer.final_attempts(), 1);
        assert_eq!(observer.exhaustions(), 1);
    }

    #[test]
    fn test_tracing_observer_expected_label() {
        let observer = TracingObserver::new("endpoint-health").expecting(200);
        assert_eq!(observer.operation(), "endpoint-health");
        assert_eq!(observer.expected(), "200");

        let default_observer = TracingObserver::default();
        assert_eq!(default_observer.operation(), "poll");
        assert_eq!(default_observer.expected(), "success");
    }

    #[test]
    fn test_arc_observer() {
        let observer = std::sync::Arc::new(StatsObserver::new());

        observer.on_attempt_start(1, 3);
        observer.on_success(1, Duration::from_millis(5));

        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.successes(), 1);
    }
}
