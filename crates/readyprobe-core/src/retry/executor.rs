//! Poll execution engine
//!
//! [`PollExecutor::poll`] invokes an action until its observation satisfies a
//! [`SuccessPredicate`] or the policy's attempt budget runs out. After an
//! exhausted budget it makes exactly one more, unconditional attempt and
//! hands that attempt's result back unchecked, so the caller always gets the
//! freshest observation available.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::RetryPolicy;

use super::error::AttemptError;
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::{calculate_delay, SuccessPredicate};

/// How a poll ended
#[derive(Debug)]
pub enum PollOutcome<T, E> {
    /// An attempt inside the budget satisfied the predicate
    Matched {
        observation: T,
        attempts: u32,
        total_duration: Duration,
    },

    /// The budget ran out; `last` is the unconditional final attempt
    Exhausted {
        last: Result<T, AttemptError<E>>,
        attempts: u32,
        total_duration: Duration,
    },
}

impl<T, E> PollOutcome<T, E> {
    /// Number of times the action was invoked
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Matched { attempts, .. } => *attempts,
            PollOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Wall-clock time from the first attempt to the end of the last
    pub fn total_duration(&self) -> Duration {
        match self {
            PollOutcome::Matched { total_duration, .. } => *total_duration,
            PollOutcome::Exhausted { total_duration, .. } => *total_duration,
        }
    }

    /// Whether an attempt inside the budget matched
    ///
    /// An exhausted poll reports `false` even when its final attempt happens
    /// to match; callers compare the final observation themselves.
    pub fn is_matched(&self) -> bool {
        matches!(self, PollOutcome::Matched { .. })
    }

    /// The last thing the action returned
    pub fn into_last(self) -> Result<T, AttemptError<E>> {
        match self {
            PollOutcome::Matched { observation, .. } => Ok(observation),
            PollOutcome::Exhausted { last, .. } => last,
        }
    }
}

/// Builder for configuring a `PollExecutor`
///
/// # Example
///
/// ```rust
/// use readyprobe_core::retry::{PollExecutorBuilder, TracingObserver};
/// use readyprobe_core::types::RetryPolicy;
///
/// let executor = PollExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("endpoint-health").expecting(200))
///     .build();
/// ```
pub struct PollExecutorBuilder<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
    jitter: bool,
}

impl Default for PollExecutorBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl PollExecutorBuilder<NoOpObserver> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: NoOpObserver,
            jitter: false,
        }
    }
}

impl<O> PollExecutorBuilder<O> {
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer<O2>(self, observer: O2) -> PollExecutorBuilder<O2> {
        PollExecutorBuilder {
            policy: self.policy,
            observer,
            jitter: self.jitter,
        }
    }

    /// Add up to 25% random variation to every delay
    ///
    /// Disabled by default so attempt timing stays reproducible.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn build(self) -> PollExecutor<O> {
        PollExecutor {
            policy: self.policy,
            observer: self.observer,
            jitter: self.jitter,
        }
    }
}

/// Poll executor with a fixed policy and observer
///
/// Holds no per-poll state, so one executor can drive any number of
/// concurrent polls.
pub struct PollExecutor<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
    jitter: bool,
}

impl PollExecutor<NoOpObserver> {
    pub fn new(policy: RetryPolicy) -> Self {
        PollExecutorBuilder::new().with_policy(policy).build()
    }
}

impl<O> PollExecutor<O> {
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O> PollExecutor<O>
where
    O: RetryObserver,
{
    /// Poll `action` until `predicate` accepts an observation
    ///
    /// Never fails: transient errors and attempt timeouts are recorded and
    /// retried, and an exhausted budget is reported as data.
    pub async fn poll<P, F, Fut, T, E>(&self, predicate: P, mut action: F) -> PollOutcome<T, E>
    where
        P: SuccessPredicate<T>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: fmt::Display,
        E: fmt::Display,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            self.observer.on_attempt_start(attempt, max_attempts);

            let result = self.run_attempt(attempt, &mut action).await;
            let delay = calculate_delay(&self.policy, attempt, self.jitter);

            match result {
                Ok(observation) if predicate.is_success(&observation) => {
                    let total_duration = start.elapsed();
                    self.observer.on_success(attempt, total_duration);
                    return PollOutcome::Matched {
                        observation,
                        attempts: attempt,
                        total_duration,
                    };
                }
                Ok(observation) => self.observer.on_mismatch(attempt, &observation, delay),
                Err(err) => self.observer.on_attempt_failed(attempt, &err, delay),
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let attempts = max_attempts.saturating_add(1);
        self.observer.on_final_attempt(attempts);

        let last = self.run_attempt(attempts, &mut action).await;
        match &last {
            Ok(observation) => self.observer.on_exhausted(attempts, observation),
            Err(err) => self.observer.on_exhausted(attempts, err),
        }

        PollOutcome::Exhausted {
            last,
            attempts,
            total_duration: start.elapsed(),
        }
    }

    async fn run_attempt<F, Fut, T, E>(
        &self,
        attempt: u32,
        action: &mut F,
    ) -> Result<T, AttemptError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.policy.attempt_timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, action()).await {
                Ok(result) => result.map_err(AttemptError::Failed),
                Err(_) => Err(AttemptError::TimedOut { attempt, timeout }),
            },
            None => action().await.map_err(AttemptError::Failed),
        }
    }
}

/// Poll with a policy and no observer
///
/// # Example
///
/// ```rust,no_run
/// use readyprobe_core::retry::{poll_with_policy, Equals};
/// use readyprobe_core::types::RetryPolicy;
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///     let outcome = poll_with_policy(&policy, Equals(200u16), || async {
///         Ok::<u16, std::io::Error>(200)
///     })
///     .await;
///     assert!(outcome.is_matched());
/// }
/// ```
pub async fn poll_with_policy<P, F, Fut, T, E>(
    policy: &RetryPolicy,
    predicate: P,
    action: F,
) -> PollOutcome<T, E>
where
    P: SuccessPredicate<T>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: fmt::Display,
    E: fmt::Display,
{
    PollExecutor::new(policy.clone())
        .poll(predicate, action)
        .await
}
