//! Error types for readyprobe-probes

use readyprobe_core::types::Observed;
use thiserror::Error;

/// Failure to get any HTTP response at all
///
/// Every variant is transient: the endpoint probe records it and retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    pub fn url(&self) -> &str {
        match self {
            TransportError::Timeout { url }
            | TransportError::Connect { url, .. }
            | TransportError::Request { url, .. } => url,
        }
    }
}

/// What a browser surface reports when it cannot confirm a selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The element did not appear within the wait window
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The page or browser is gone
    #[error("browser surface unavailable: {0}")]
    Unavailable(String),
}

/// Element readiness failures, raised to the caller
#[derive(Error, Debug)]
pub enum ReadinessError {
    /// The element never appeared within its wait window
    #[error("element '{selector}' did not appear on {page} within {timeout_ms}ms (last observed: {last_observed})")]
    Timeout {
        selector: String,
        page: String,
        timeout_ms: u64,
        last_observed: Observed,
    },

    /// The surface failed for a reason other than the wait window closing
    #[error("could not check element '{selector}' on {page}: {message}")]
    Surface {
        selector: String,
        page: String,
        message: String,
    },

    /// One selector of a composite page check failed
    #[error("page '{page}' is not ready ({} selector(s) passed): {source}", .passed.len())]
    PageNotReady {
        page: String,
        passed: Vec<String>,
        #[source]
        source: Box<ReadinessError>,
    },
}

impl ReadinessError {
    /// The selector that failed, looking through composite errors
    pub fn selector(&self) -> &str {
        match self {
            ReadinessError::Timeout { selector, .. } | ReadinessError::Surface { selector, .. } => {
                selector
            }
            ReadinessError::PageNotReady { source, .. } => source.selector(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ReadinessError::Timeout { .. } => true,
            ReadinessError::Surface { .. } => false,
            ReadinessError::PageNotReady { source, .. } => source.is_timeout(),
        }
    }
}

/// Errors that stop an endpoint probe before its first request
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The requested retry policy is invalid
    #[error(transparent)]
    Policy(#[from] readyprobe_core::Error),

    /// The URL cannot be requested at all
    #[error("invalid probe target {url}: {message}")]
    InvalidTarget { url: String, message: String },
}
