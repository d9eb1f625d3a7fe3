//! Test harness wiring
//!
//! Loads the layered configuration once and hands out probes, HTTP clients
//! and the browser project matrix built from it.

use anyhow::{Context, Result};
use readyprobe_core::types::{BrowserProject, ProbeConfig};
use readyprobe_core::HierarchicalConfigLoader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::element::ElementReadinessProbe;
use crate::endpoint::EndpointHealthProbe;
use crate::error::ProbeError;
use crate::http::{HttpClient, HttpClientOptions, ReqwestHttpClient};
use crate::page::PageReadiness;
use crate::surface::BrowserSurface;

#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: ProbeConfig,
}

impl Harness {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Build from embedded defaults, `~/.readyprobe/config.yaml` and `READYPROBE_*`
    pub fn load() -> Result<Self> {
        let loader =
            HierarchicalConfigLoader::new().context("Failed to locate configuration directory")?;
        let config = loader
            .load_probe_config()
            .with_context(|| format!("Failed to load configuration from {}", loader.config_dir()))?;

        Ok(Self::new(config))
    }

    /// Install a fmt subscriber filtered by `RUST_LOG`, or `default_directive` when unset
    ///
    /// Safe to call more than once; later calls leave the first subscriber in place.
    pub fn init_tracing(default_directive: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .try_init();
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// One project per configured engine
    pub fn projects(&self) -> Vec<BrowserProject> {
        self.config.harness.projects()
    }

    pub fn http_client(&self) -> Result<ReqwestHttpClient> {
        ReqwestHttpClient::new(&HttpClientOptions::from(&self.config.endpoint))
            .context("Failed to build HTTP client")
    }

    pub fn endpoint_probe<'a, C>(
        &self,
        client: &'a C,
        url: &str,
    ) -> Result<EndpointHealthProbe<'a, C>, ProbeError>
    where
        C: HttpClient + ?Sized,
    {
        EndpointHealthProbe::from_config(client, url, &self.config.endpoint)
    }

    pub fn element_probe<'a, S>(&self, surface: &'a S, selector: &str) -> ElementReadinessProbe<'a, S>
    where
        S: BrowserSurface + ?Sized,
    {
        ElementReadinessProbe::from_config(surface, selector, &self.config.element)
    }

    /// Preset page check using the configured element window
    pub fn page(&self, page: PageReadiness) -> PageReadiness {
        page.with_timeout(self.config.element.timeout())
    }
}
