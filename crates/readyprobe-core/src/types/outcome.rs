//! Probe outcome types

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// What a probe is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum Expectation {
    /// An HTTP response with this status code
    Status(u16),

    /// An element attached to the page
    Present,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Status(code) => write!(f, "{}", code),
            Expectation::Present => write!(f, "present"),
        }
    }
}

/// What a probe actually saw on its last attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum Observed {
    /// An HTTP response with this status code
    Status(u16),

    /// The element was found
    Present,

    /// The element never appeared
    Absent,

    /// The target could not be reached at all
    Unreachable(String),
}

impl Observed {
    /// Build an unreachable sentinel from any error message
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Observed::Unreachable(reason.into())
    }

    /// Whether this observation fulfills the expectation
    pub fn satisfies(&self, expected: &Expectation) -> bool {
        match (self, expected) {
            (Observed::Status(actual), Expectation::Status(wanted)) => actual == wanted,
            (Observed::Present, Expectation::Present) => true,
            _ => false,
        }
    }

    /// Status code, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Observed::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Status(code) => write!(f, "{}", code),
            Observed::Present => write!(f, "present"),
            Observed::Absent => write!(f, "absent"),
            Observed::Unreachable(reason) => write!(f, "unreachable ({})", reason),
        }
    }
}

/// Result of one probe invocation
///
/// `succeeded` is derived from `actual` and `expected` when the outcome is
/// built and cannot drift from them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProbeOutcome {
    target: String,
    expected: Expectation,
    actual: Observed,
    attempts_made: u32,
    succeeded: bool,
}

impl ProbeOutcome {
    /// Build an outcome, deriving `succeeded` from `actual` and `expected`
    pub fn new(
        target: impl Into<String>,
        expected: Expectation,
        actual: Observed,
        attempts_made: u32,
    ) -> Self {
        let succeeded = actual.satisfies(&expected);
        Self {
            target: target.into(),
            expected,
            actual,
            attempts_made,
            succeeded,
        }
    }

    /// URL or selector that was probed
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn expected(&self) -> &Expectation {
        &self.expected
    }

    pub fn actual(&self) -> &Observed {
        &self.actual
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Turn a failed outcome into an error carrying the target and last observation
    pub fn ensure_succeeded(&self) -> Result<()> {
        if self.succeeded {
            return Ok(());
        }

        Err(Error::ProbeFailed {
            target: self.target.clone(),
            expected: self.expected.to_string(),
            actual: self.actual.to_string(),
            attempts: self.attempts_made,
        })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expected: {}", self.expected)?;
        writeln!(f, "Actual: {}", self.actual)?;
        writeln!(f, "Target: {}", self.target)?;
        write!(f, "Attempts: {}", self.attempts_made)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_match() {
        let outcome = ProbeOutcome::new("http://x", Expectation::Status(200), Observed::Status(200), 1);
        assert!(outcome.succeeded());
        assert!(outcome.ensure_succeeded().is_ok());
    }

    #[test]
    fn test_status_mismatch() {
        let outcome = ProbeOutcome::new("http://x", Expectation::Status(200), Observed::Status(503), 4);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.actual().status(), Some(503));

        let err = outcome.ensure_succeeded().unwrap_err();
        assert!(matches!(err, Error::ProbeFailed { attempts: 4, .. }));
    }

    #[test]
    fn test_unreachable_never_satisfies() {
        let actual = Observed::unreachable("connection refused");
        assert!(!actual.satisfies(&Expectation::Status(200)));
        assert!(!actual.satisfies(&Expectation::Present));
        assert_eq!(actual.status(), None);
        assert_eq!(actual.to_string(), "unreachable (connection refused)");
    }

    #[test]
    fn test_presence() {
        assert!(Observed::Present.satisfies(&Expectation::Present));
        assert!(!Observed::Absent.satisfies(&Expectation::Present));
        assert!(!Observed::Status(200).satisfies(&Expectation::Present));
    }

    #[test]
    fn test_display_summary() {
        let outcome = ProbeOutcome::new(
            "https://practice.expandtesting.com/",
            Expectation::Status(200),
            Observed::Status(502),
            11,
        );
        let summary = outcome.to_string();
        assert!(summary.contains("Expected: 200"));
        assert!(summary.contains("Actual: 502"));
        assert!(summary.contains("Target: https://practice.expandtesting.com/"));
        assert!(summary.contains("Attempts: 11"));
    }
}
