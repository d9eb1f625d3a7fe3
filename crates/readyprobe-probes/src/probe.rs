//! Probe strategy trait
//!
//! A probe is the thin, target-specific half of a readiness check: how to
//! make one observation and how to judge it. The poll loop itself lives in
//! [`readyprobe_core::retry`] and is shared by every probe.

use async_trait::async_trait;
use readyprobe_core::retry::{AttemptError, ClosurePredicate, PollExecutor, RetryObserver};
use readyprobe_core::types::{Expectation, Observed, ProbeOutcome};
use std::fmt;

#[async_trait]
pub trait Probe: Send + Sync {
    type Observation: fmt::Display + Send;
    type Error: fmt::Display + Send;

    /// URL or selector, for diagnostics
    fn target(&self) -> String;

    fn expectation(&self) -> Expectation;

    /// Make one observation
    async fn observe(&self) -> Result<Self::Observation, Self::Error>;

    fn matches(&self, observation: &Self::Observation) -> bool;

    /// Describe an observation in outcome terms
    fn record(&self, observation: &Self::Observation) -> Observed;

    /// Describe an attempt that produced no observation
    fn record_failure(&self, error: &AttemptError<Self::Error>) -> Observed {
        Observed::unreachable(error.to_string())
    }
}

/// Drive `probe` through the poll engine and build its outcome
///
/// `succeeded` is re-derived from the final observation, so a match that
/// only arrives on the unconditional final attempt still counts.
pub async fn run_probe<P, O>(executor: &PollExecutor<O>, probe: &P) -> ProbeOutcome
where
    P: Probe + ?Sized,
    O: RetryObserver,
{
    let outcome = executor
        .poll(ClosurePredicate::new(|observation: &P::Observation| probe.matches(observation)), || {
            probe.observe()
        })
        .await;

    let attempts = outcome.attempts();
    let actual = match outcome.into_last() {
        Ok(observation) => probe.record(&observation),
        Err(err) => probe.record_failure(&err),
    };

    ProbeOutcome::new(probe.target(), probe.expectation(), actual, attempts)
}
