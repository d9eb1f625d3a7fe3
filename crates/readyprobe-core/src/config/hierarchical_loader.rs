//! Hierarchical configuration loader with precedence
//!
//! Loads probe configuration from multiple sources with the following
//! precedence (low to high):
//! 1. Embedded defaults (built into the library)
//! 2. User config (~/.readyprobe/config.yaml)
//! 3. Environment variables (READYPROBE_* prefix)
//! 4. Explicit arguments (handled by the caller)
//!
//! The user file only needs to mention the keys it changes: it is merged key
//! by key over the embedded defaults before deserialization.

use crate::error::{Error, Result};
use crate::types::{BrowserEngine, ProbeConfig, RetryPolicy, RetryPolicyConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use std::str::FromStr;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "probe-defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader for the standard config directory (~/.readyprobe)
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::invalid_config("Could not determine home directory"))?;

        Ok(Utf8PathBuf::from(home).join(".readyprobe"))
    }

    /// Load probe configuration with hierarchical precedence
    pub fn load_probe_config(&self) -> Result<ProbeConfig> {
        let mut merged = Self::load_embedded_value(DEFAULTS_FILE)?;

        let user_config_path = self.config_dir.join(USER_CONFIG_FILE);
        if user_config_path.exists() {
            let overlay = self.load_yaml_value(&user_config_path)?;
            Self::merge_values(&mut merged, overlay);
            tracing::debug!(path = %user_config_path, "merged user probe config");
        }

        let config: ProbeConfig = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Failed to parse probe config: {}", e)))?;

        self.apply_env_overrides(config)
    }

    fn load_embedded_value(filename: &str) -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    fn load_yaml_value(&self, path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;

        // An empty file parses as null and changes nothing
        Ok(match value {
            Value::Null => Value::Mapping(Default::default()),
            other => other,
        })
    }

    /// Merge `overlay` into `base`; mappings merge per key, anything else replaces
    fn merge_values(base: &mut Value, overlay: Value) {
        match (base, overlay) {
            (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
                for (key, overlay_value) in overlay_map {
                    match base_map.get_mut(&key) {
                        Some(base_value) => Self::merge_values(base_value, overlay_value),
                        None => {
                            base_map.insert(key, overlay_value);
                        }
                    }
                }
            }
            (base, overlay) => *base = overlay,
        }
    }

    /// Apply environment variable overrides to probe config
    fn apply_env_overrides(&self, mut config: ProbeConfig) -> Result<ProbeConfig> {
        let mut retry = RetryPolicyConfig::from(config.endpoint.retry.clone());
        let mut retry_changed = false;

        if let Ok(val) = env::var("READYPROBE_MAX_ATTEMPTS") {
            retry.max_attempts = parse_env("READYPROBE_MAX_ATTEMPTS", &val)?;
            retry_changed = true;
        }

        if let Ok(val) = env::var("READYPROBE_DELAY_MS") {
            retry.delay_ms = parse_env("READYPROBE_DELAY_MS", &val)?;
            retry_changed = true;
        }

        if retry_changed {
            config.endpoint.retry = RetryPolicy::try_from(retry)
                .map_err(|e| Error::invalid_config(format!("Invalid endpoint retry override: {}", e)))?;
        }

        if let Ok(val) = env::var("READYPROBE_DESIRED_STATUS") {
            config.endpoint.desired_status = parse_env("READYPROBE_DESIRED_STATUS", &val)?;
        }

        if let Ok(val) = env::var("READYPROBE_FOLLOW_REDIRECTS") {
            config.endpoint.follow_redirects = parse_env("READYPROBE_FOLLOW_REDIRECTS", &val)?;
        }

        if let Ok(val) = env::var("READYPROBE_REQUEST_TIMEOUT_MS") {
            config.endpoint.request_timeout_ms = parse_env("READYPROBE_REQUEST_TIMEOUT_MS", &val)?;
        }

        if let Ok(val) = env::var("READYPROBE_ELEMENT_TIMEOUT_MS") {
            config.element.timeout_ms = parse_env("READYPROBE_ELEMENT_TIMEOUT_MS", &val)?;
        }

        if let Ok(val) = env::var("READYPROBE_HEADED") {
            config.harness.headed = parse_env("READYPROBE_HEADED", &val)?;
        }

        if let Ok(val) = env::var("READYPROBE_ENGINES") {
            config.harness.engines = val
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(BrowserEngine::from_str)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::invalid_config)?;
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::invalid_config(format!("{} has an invalid value: {}", name, value))
    })
}
