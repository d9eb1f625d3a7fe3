//! Error types for readyprobe-core

use thiserror::Error;

/// Result type alias using readyprobe-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for readyprobe
#[derive(Error, Debug)]
pub enum Error {
    /// A retry policy that can never run (zero attempts, bad multiplier, ...)
    #[error("Invalid retry policy: {reason}")]
    InvalidPolicy { reason: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A probe finished without observing what it expected
    #[error("Probe of {target} failed after {attempts} attempts: expected {expected}, got {actual}")]
    ProbeFailed {
        target: String,
        expected: String,
        actual: String,
        attempts: u32,
    },
}

impl Error {
    /// Create an invalid policy error
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            reason: reason.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this error was raised while validating a retry policy
    pub fn is_invalid_policy(&self) -> bool {
        matches!(self, Error::InvalidPolicy { .. })
    }
}
