//! Endpoint health probe
//!
//! Polls a URL until it answers with the desired status code. Wrong statuses
//! and transport errors alike are retried; after the retry budget one last
//! request is made and its result returned whatever it is. A terminal
//! transport error becomes [`Observed::Unreachable`], so the caller always
//! receives a concrete, comparable outcome.
//!
//! # Example
//!
//! ```no_run
//! use readyprobe_probes::{check_endpoint_healthy, HttpClientOptions, ReqwestHttpClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ReqwestHttpClient::new(&HttpClientOptions::default())?;
//!     let outcome = check_endpoint_healthy(
//!         &client,
//!         "https://practice.expandtesting.com/",
//!         Some(3),
//!         Some(Duration::from_millis(100)),
//!         None,
//!     )
//!     .await?;
//!
//!     println!("{}", outcome);
//!     outcome.ensure_succeeded()?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use readyprobe_core::retry::{Equals, PollExecutorBuilder, SuccessPredicate, TracingObserver};
use readyprobe_core::types::{
    EndpointConfig, Expectation, Observed, ProbeOutcome, RetryPolicy, RetryPolicyConfig,
};
use std::time::Duration;
use tracing::info;

use crate::error::{ProbeError, TransportError};
use crate::http::HttpClient;
use crate::probe::{run_probe, Probe};

const OPERATION: &str = "endpoint-health";

/// Polls one URL for one status code
pub struct EndpointHealthProbe<'a, C: ?Sized> {
    client: &'a C,
    url: String,
    desired_status: u16,
    policy: RetryPolicy,
}

impl<'a, C> EndpointHealthProbe<'a, C>
where
    C: HttpClient + ?Sized,
{
    /// Probe `url` with the default endpoint policy (10 attempts, 3s apart, expecting 200)
    pub fn new(client: &'a C, url: impl Into<String>) -> Result<Self, ProbeError> {
        Self::from_config(client, url, &EndpointConfig::default())
    }

    pub fn from_config(
        client: &'a C,
        url: impl Into<String>,
        config: &EndpointConfig,
    ) -> Result<Self, ProbeError> {
        let url = url.into();
        validate_url(&url)?;

        Ok(Self {
            client,
            url,
            desired_status: config.desired_status,
            policy: config.retry.clone(),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_desired_status(mut self, status: u16) -> Self {
        self.desired_status = status;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Poll until healthy or the budget is spent, logging every attempt
    pub async fn run(&self) -> ProbeOutcome {
        let executor = PollExecutorBuilder::new()
            .with_policy(self.policy.clone())
            .with_observer(
                TracingObserver::new(OPERATION).expecting(self.expectation()),
            )
            .build();

        let outcome = run_probe(&executor, self).await;

        info!(
            url = %self.url,
            expected = %outcome.expected(),
            actual = %outcome.actual(),
            attempts = outcome.attempts_made(),
            succeeded = outcome.succeeded(),
            "endpoint health check finished"
        );

        outcome
    }
}

#[async_trait]
impl<C> Probe for EndpointHealthProbe<'_, C>
where
    C: HttpClient + ?Sized,
{
    type Observation = u16;
    type Error = TransportError;

    fn target(&self) -> String {
        self.url.clone()
    }

    fn expectation(&self) -> Expectation {
        Expectation::Status(self.desired_status)
    }

    async fn observe(&self) -> Result<u16, TransportError> {
        self.client.get_status(&self.url).await
    }

    fn matches(&self, status: &u16) -> bool {
        Equals(self.desired_status).is_success(status)
    }

    fn record(&self, status: &u16) -> Observed {
        Observed::Status(*status)
    }
}

fn validate_url(url: &str) -> Result<(), ProbeError> {
    let parsed = url::Url::parse(url).map_err(|e| ProbeError::InvalidTarget {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProbeError::InvalidTarget {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Check that `url` answers with `desired_status` (200 by default)
///
/// `max_attempts` and `delay` override the endpoint defaults of 10 attempts
/// 3 seconds apart. Returns an error only for an invalid policy or URL; an
/// unhealthy endpoint is reported through the outcome.
pub async fn check_endpoint_healthy<C>(
    client: &C,
    url: &str,
    max_attempts: Option<u32>,
    delay: Option<Duration>,
    desired_status: Option<u16>,
) -> Result<ProbeOutcome, ProbeError>
where
    C: HttpClient + ?Sized,
{
    let config = EndpointConfig::default();
    let mut policy = RetryPolicyConfig::from(config.retry.clone());
    if let Some(max_attempts) = max_attempts {
        policy.max_attempts = max_attempts;
    }
    if let Some(delay) = delay {
        policy.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    }

    let probe = EndpointHealthProbe::from_config(client, url, &config)?
        .with_policy(RetryPolicy::try_from(policy)?)
        .with_desired_status(desired_status.unwrap_or(config.desired_status));

    Ok(probe.run().await)
}
