//! Type definitions for readyprobe

mod outcome;
mod policy;
mod probe_config;

pub use outcome::{Expectation, Observed, ProbeOutcome};
pub use policy::{RetryPolicy, RetryPolicyConfig, RetryStrategy};
pub use probe_config::{
    BrowserEngine, BrowserProject, ElementConfig, EndpointConfig, HarnessConfig, ProbeConfig,
};
