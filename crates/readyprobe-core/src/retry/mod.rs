//! Generalized poll engine with policy-based configuration
//!
//! Every readiness check in this workspace is a specialization of one loop:
//! invoke an action, stop as soon as its observation satisfies a success
//! predicate, otherwise wait and try again until the attempt budget is spent,
//! then make one unconditional final attempt and return what it saw.
//!
//! # Features
//!
//! - Delay strategies: None, Fixed (default), Exponential, Linear backoff
//! - Optional jitter and per-attempt timeouts
//! - Transient failures are recorded and retried, never propagated
//! - Observable attempts via the `RetryObserver` trait
//! - Built-in `TracingObserver` that logs expected vs. actual per attempt
//!
//! # Example
//!
//! ```rust,no_run
//! use readyprobe_core::retry::{poll_with_policy, Equals};
//! use readyprobe_core::types::RetryPolicy;
//! use std::time::Duration;
//!
//! async fn example() -> readyprobe_core::Result<()> {
//!     let policy = RetryPolicy::fixed(3, Duration::from_millis(100))?;
//!
//!     let outcome = poll_with_policy(&policy, Equals(200u16), || async {
//!         // Issue a request and return its status code
//!         Ok::<u16, std::io::Error>(503)
//!     })
//!     .await;
//!
//!     // 3 attempts inside the budget plus the final unconditional one
//!     assert_eq!(outcome.attempts(), 4);
//!     Ok(())
//! }
//! ```

mod error;
mod executor;
mod observer;
mod strategies;

pub use error::AttemptError;
pub use executor::{poll_with_policy, PollExecutor, PollExecutorBuilder, PollOutcome};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use strategies::{calculate_delay, ClosurePredicate, Equals, SuccessPredicate};
