//! Build polling configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::handlers::jobs::PollingPolicy;

use super::error::ValidationError;

/// How long a build request waits for the build to finish
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Seconds between build status checks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Seconds to wait before answering that the build is still running
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
}

impl PollingConfig {
    pub fn policy(&self) -> PollingPolicy {
        PollingPolicy::new(
            Duration::from_secs(self.interval_secs),
            Duration::from_secs(self.max_wait_secs),
        )
    }

    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_secs == 0 {
            return Err(ValidationError::InvalidPollingInterval);
        }
        if self.interval_secs > self.max_wait_secs {
            return Err(ValidationError::PollingIntervalExceedsMaxWait);
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            max_wait_secs: default_max_wait(),
        }
    }
}

fn default_interval() -> u64 {
    60
}

fn default_max_wait() -> u64 {
    600
}
