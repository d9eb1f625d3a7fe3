//! Element readiness probe
//!
//! One blocking wait per selector. The browser surface polls the DOM itself
//! for the whole window, so there is no caller-side retry loop: the window is
//! the retry, and a selector that never shows up is raised as a timeout
//! because nothing that depends on the element can proceed without it.

use async_trait::async_trait;
use readyprobe_core::retry::AttemptError;
use readyprobe_core::types::{ElementConfig, Expectation, Observed, ProbeOutcome};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ReadinessError, SurfaceError};
use crate::probe::Probe;
use crate::surface::BrowserSurface;

/// Waits for one selector on one surface
pub struct ElementReadinessProbe<'a, S: ?Sized> {
    surface: &'a S,
    selector: String,
    timeout: Duration,
}

impl<'a, S> ElementReadinessProbe<'a, S>
where
    S: BrowserSurface + ?Sized,
{
    /// Probe `selector` with the default 5 second window
    pub fn new(surface: &'a S, selector: impl Into<String>) -> Self {
        Self::from_config(surface, selector, &ElementConfig::default())
    }

    pub fn from_config(surface: &'a S, selector: impl Into<String>, config: &ElementConfig) -> Self {
        Self {
            surface,
            selector: selector.into(),
            timeout: config.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait once; raise if the element does not appear
    pub async fn check(&self) -> Result<(), ReadinessError> {
        let page = self.surface.current_url();
        debug!(
            selector = %self.selector,
            page = %page,
            timeout_ms = self.timeout.as_millis() as u64,
            "waiting for element"
        );

        match self.observe().await {
            Ok(_) => Ok(()),
            Err(SurfaceError::Timeout { .. }) => {
                warn!(selector = %self.selector, page = %page, "element did not appear");
                Err(ReadinessError::Timeout {
                    selector: self.selector.clone(),
                    page,
                    timeout_ms: self.timeout.as_millis() as u64,
                    last_observed: Observed::Absent,
                })
            }
            Err(SurfaceError::Unavailable(message)) => {
                warn!(selector = %self.selector, page = %page, error = %message, "browser surface failed");
                Err(ReadinessError::Surface {
                    selector: self.selector.clone(),
                    page,
                    message,
                })
            }
        }
    }

    /// Wait once and report the result as data
    ///
    /// Always a single attempt: `attempts_made` is 1.
    pub async fn outcome(&self) -> ProbeOutcome {
        let actual = match self.observe().await {
            Ok(observed) => self.record(&observed),
            Err(err) => self.record_failure(&AttemptError::Failed(err)),
        };

        ProbeOutcome::new(self.target(), self.expectation(), actual, 1)
    }
}

#[async_trait]
impl<S> Probe for ElementReadinessProbe<'_, S>
where
    S: BrowserSurface + ?Sized,
{
    type Observation = Observed;
    type Error = SurfaceError;

    fn target(&self) -> String {
        self.selector.clone()
    }

    fn expectation(&self) -> Expectation {
        Expectation::Present
    }

    async fn observe(&self) -> Result<Observed, SurfaceError> {
        self.surface
            .wait_for_selector(&self.selector, self.timeout)
            .await
            .map(|()| Observed::Present)
    }

    fn matches(&self, observation: &Observed) -> bool {
        observation.satisfies(&Expectation::Present)
    }

    fn record(&self, observation: &Observed) -> Observed {
        observation.clone()
    }

    /// A closed wait window means the element is absent, not unreachable
    fn record_failure(&self, error: &AttemptError<SurfaceError>) -> Observed {
        match error.source_ref() {
            Some(SurfaceError::Unavailable(message)) => Observed::unreachable(message.clone()),
            _ => Observed::Absent,
        }
    }
}

/// Raise unless `selector` appears on `surface` within `timeout` (5s by default)
pub async fn check_element_ready<S>(
    surface: &S,
    selector: &str,
    timeout: Option<Duration>,
) -> Result<(), ReadinessError>
where
    S: BrowserSurface + ?Sized,
{
    let mut probe = ElementReadinessProbe::new(surface, selector);
    if let Some(timeout) = timeout {
        probe = probe.with_timeout(timeout);
    }
    probe.check().await
}
