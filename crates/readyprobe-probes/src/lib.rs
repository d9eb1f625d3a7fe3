//! # readyprobe-probes
//!
//! Readiness probes for end-to-end test suites:
//! - [`EndpointHealthProbe`]: poll a URL until it answers with the desired
//!   status, reporting the result as a [`ProbeOutcome`](readyprobe_core::types::ProbeOutcome)
//! - [`ElementReadinessProbe`]: wait once for a selector and raise if it
//!   never appears
//! - [`PageReadiness`]: all key elements of a page, checked in order
//!
//! Probes depend only on the [`HttpClient`] and [`BrowserSurface`]
//! capabilities, so the same checks run against reqwest and a real browser
//! or against in-process fakes.

pub mod element;
pub mod endpoint;
pub mod error;
pub mod harness;
pub mod http;
pub mod page;
pub mod probe;
pub mod surface;

pub use element::{check_element_ready, ElementReadinessProbe};
pub use endpoint::{check_endpoint_healthy, EndpointHealthProbe};
pub use error::{ProbeError, ReadinessError, SurfaceError, TransportError};
pub use harness::Harness;
pub use http::{HttpClient, HttpClientOptions, ReqwestHttpClient, MAX_REDIRECTS};
pub use page::PageReadiness;
pub use probe::{run_probe, Probe};
pub use surface::BrowserSurface;
