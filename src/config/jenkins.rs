//! Jenkins server configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::jenkins::JenkinsConfig;

use super::error::ValidationError;

/// Jenkins server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JenkinsServerConfig {
    /// Server root URL
    pub url: String,

    /// User the API token belongs to
    pub username: String,

    /// API token
    pub api_token: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Queue item checks before a triggered build counts as stuck
    #[serde(default = "default_queue_poll_attempts")]
    pub queue_poll_attempts: u32,

    /// Delay between queue item checks in milliseconds
    #[serde(default = "default_queue_poll_interval_ms")]
    pub queue_poll_interval_ms: u64,
}

impl JenkinsServerConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn queue_poll_interval(&self) -> Duration {
        Duration::from_millis(self.queue_poll_interval_ms)
    }

    /// Client settings for [`crate::adapters::jenkins::JenkinsClient`]
    pub fn client_config(&self) -> JenkinsConfig {
        JenkinsConfig::new(
            self.url.clone(),
            self.username.clone(),
            self.api_token.expose_secret().clone(),
        )
        .with_timeout(self.timeout())
        .with_queue_polling(self.queue_poll_attempts, self.queue_poll_interval())
    }

    /// Validate Jenkins configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("JENKINS__URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidJenkinsUrl);
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingRequired("JENKINS__USERNAME"));
        }
        if self.api_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("JENKINS__API_TOKEN"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_queue_poll_attempts() -> u32 {
    30
}

fn default_queue_poll_interval_ms() -> u64 {
    1000
}
