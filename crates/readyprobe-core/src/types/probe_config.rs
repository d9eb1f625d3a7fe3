//! Probe configuration types
//!
//! These types are loaded by the hierarchical config loader and handed to the
//! harness at startup. Nothing here is global: every probe receives the values
//! it needs explicitly.

use super::policy::{RetryPolicy, RetryPolicyConfig, RetryStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Top-level probe configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProbeConfig {
    /// Endpoint health probe defaults
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Element readiness probe defaults
    #[serde(default)]
    pub element: ElementConfig,

    /// Browser matrix for the test harness
    #[serde(default)]
    pub harness: HarnessConfig,
}

/// Endpoint health probe defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointConfig {
    /// Retry budget and delay between requests
    #[serde(default = "default_endpoint_retry")]
    pub retry: RetryPolicy,

    /// Status code that counts as healthy
    #[serde(default = "default_desired_status")]
    pub desired_status: u16,

    /// Follow redirects instead of observing the first hop
    #[serde(default)]
    pub follow_redirects: bool,

    /// Timeout for a single HTTP request in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            retry: default_endpoint_retry(),
            desired_status: default_desired_status(),
            follow_redirects: false,
            request_timeout_ms: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl EndpointConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_endpoint_retry() -> RetryPolicy {
    RetryPolicy::try_from(RetryPolicyConfig {
        max_attempts: 10,
        strategy: RetryStrategy::FixedDelay,
        delay_ms: 3000,
        ..RetryPolicyConfig::default()
    })
    .unwrap_or_default()
}
fn default_desired_status() -> u16 {
    200
}
fn default_request_timeout() -> u64 {
    30000
}
fn default_user_agent() -> String {
    format!("readyprobe/{}", env!("CARGO_PKG_VERSION"))
}

/// Element readiness probe defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ElementConfig {
    /// Wait window for a single selector in milliseconds
    #[serde(default = "default_element_timeout")]
    pub timeout_ms: u64,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_element_timeout(),
        }
    }
}

impl ElementConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_element_timeout() -> u64 {
    5000
}

/// Browser engine a scenario can run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserEngine {
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserEngine {
    /// All engines, in the order projects are generated
    pub const ALL: [BrowserEngine; 3] = [
        BrowserEngine::Chromium,
        BrowserEngine::Firefox,
        BrowserEngine::Webkit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BrowserEngine::Chromium => "chromium",
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Webkit => "webkit",
        }
    }

    /// Device profile the engine emulates
    pub fn device(&self) -> &'static str {
        match self {
            BrowserEngine::Chromium => "Desktop Chrome",
            BrowserEngine::Firefox => "Desktop Firefox",
            BrowserEngine::Webkit => "Desktop Safari",
        }
    }
}

impl fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrowserEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserEngine::Chromium),
            "firefox" => Ok(BrowserEngine::Firefox),
            "webkit" | "safari" => Ok(BrowserEngine::Webkit),
            other => Err(format!(
                "Unknown browser engine: {}. Valid engines: chromium, firefox, webkit",
                other
            )),
        }
    }
}

/// One browser project the harness runs scenarios in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserProject {
    pub name: String,
    pub engine: BrowserEngine,
    pub device: String,
    pub headless: bool,
}

/// Browser matrix passed to the harness at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarnessConfig {
    /// Run browsers with a visible window
    #[serde(default)]
    pub headed: bool,

    /// Engines to exercise
    #[serde(default = "default_engines")]
    pub engines: Vec<BrowserEngine>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            headed: false,
            engines: default_engines(),
        }
    }
}

fn default_engines() -> Vec<BrowserEngine> {
    BrowserEngine::ALL.to_vec()
}

impl HarnessConfig {
    /// Expand the matrix into projects, one per enabled engine
    ///
    /// Projects follow [`BrowserEngine::ALL`] order and each engine appears
    /// once, whatever order or duplicates the configuration lists.
    pub fn projects(&self) -> Vec<BrowserProject> {
        BrowserEngine::ALL
            .iter()
            .filter(|engine| self.engines.contains(engine))
            .map(|engine| BrowserProject {
                name: engine.name().to_string(),
                engine: *engine,
                device: engine.device().to_string(),
                headless: !self.headed,
            })
            .collect()
    }
}
