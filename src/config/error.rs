//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind host")]
    InvalidHost,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Jenkins URL must be an http(s) URL")]
    InvalidJenkinsUrl,

    #[error("Polling interval must be non-zero")]
    InvalidPollingInterval,

    #[error("Polling interval exceeds the maximum wait")]
    PollingIntervalExceedsMaxWait,

    #[error("Request timeout must exceed the build wait ({0}s)")]
    RequestTimeoutBelowBuildWait(u64),
}
