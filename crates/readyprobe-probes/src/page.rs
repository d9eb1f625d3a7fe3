//! Composite page readiness
//!
//! A page is ready when every one of its key elements is. Selectors are
//! checked in order and the first failure stops the check; the error lists
//! which selectors already passed, so "nothing rendered" (the application
//! is down) reads differently from "one control missing" (the markup
//! changed).

use std::time::Duration;
use tracing::info;

use crate::element::ElementReadinessProbe;
use crate::error::ReadinessError;
use crate::surface::BrowserSurface;

/// Named set of selectors that must all be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReadiness {
    name: String,
    selectors: Vec<String>,
    timeout: Duration,
}

impl PageReadiness {
    pub fn new<I, S>(name: impl Into<String>, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            selectors: selectors.into_iter().map(Into::into).collect(),
            timeout: Duration::from_millis(5000),
        }
    }

    /// Login form: heading, credentials and submit control
    pub fn login() -> Self {
        Self::new(
            "login",
            [
                "h1",
                "input[name=\"username\"]",
                "input[name=\"password\"]",
                "button[type=\"submit\"]",
            ],
        )
    }

    /// Registration form: login controls plus password confirmation
    pub fn register() -> Self {
        Self::new(
            "register",
            [
                "h1",
                "input[name=\"username\"]",
                "input[name=\"password\"]",
                "input[name=\"confirmPassword\"]",
                "button[type=\"submit\"]",
            ],
        )
    }

    /// Wait window applied to each selector
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check every selector in order, stopping at the first failure
    pub async fn check<S>(&self, surface: &S) -> Result<(), ReadinessError>
    where
        S: BrowserSurface + ?Sized,
    {
        let mut passed = Vec::with_capacity(self.selectors.len());

        for selector in &self.selectors {
            let probe = ElementReadinessProbe::new(surface, selector.as_str())
                .with_timeout(self.timeout);

            if let Err(err) = probe.check().await {
                return Err(ReadinessError::PageNotReady {
                    page: self.name.clone(),
                    passed,
                    source: Box::new(err),
                });
            }
            passed.push(selector.clone());
        }

        info!(
            page = %self.name,
            url = %surface.current_url(),
            selectors = passed.len(),
            "page ready"
        );
        Ok(())
    }
}
