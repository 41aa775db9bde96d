//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `JENKINS_LEX_BOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use jenkins_lex_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.port);
//! ```

mod error;
mod jenkins;
mod polling;
mod server;

pub use error::{ConfigError, ValidationError};
pub use jenkins::JenkinsServerConfig;
pub use polling::PollingConfig;
pub use server::ServerConfig;

use serde::Deserialize;

use crate::application::JobHandlerSettings;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Jenkins server and credentials
    pub jenkins: JenkinsServerConfig,

    /// Build polling limits
    #[serde(default)]
    pub polling: PollingConfig,

    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `JENKINS_LEX_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `JENKINS_LEX_BOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `JENKINS_LEX_BOT__JENKINS__URL=...` -> `jenkins.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("JENKINS_LEX_BOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.jenkins.validate()?;
        self.polling.validate()?;
        self.server.validate()?;

        // A build request must be answered by the bot, not cut off by the timeout layer
        let build_wait = self.build_wait_secs();
        if self.server.request_timeout_secs <= build_wait {
            return Err(ValidationError::RequestTimeoutBelowBuildWait(build_wait));
        }
        Ok(())
    }

    /// Longest a build request can spend waiting: queue polling plus build polling.
    pub fn build_wait_secs(&self) -> u64 {
        let queue_ms = u64::from(self.jenkins.queue_poll_attempts)
            .saturating_mul(self.jenkins.queue_poll_interval_ms);
        self.polling
            .max_wait_secs
            .saturating_add(queue_ms.saturating_add(999) / 1000)
    }

    /// Settings for the job handler graph
    pub fn handler_settings(&self) -> JobHandlerSettings {
        JobHandlerSettings::new(self.jenkins.url.clone()).with_polling(self.polling.policy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("JENKINS_LEX_BOT__JENKINS__URL", "http://jenkins:8080");
        env::set_var("JENKINS_LEX_BOT__JENKINS__USERNAME", "bot");
        env::set_var("JENKINS_LEX_BOT__JENKINS__API_TOKEN", "token");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("JENKINS_LEX_BOT__JENKINS__URL");
        env::remove_var("JENKINS_LEX_BOT__JENKINS__USERNAME");
        env::remove_var("JENKINS_LEX_BOT__JENKINS__API_TOKEN");
        env::remove_var("JENKINS_LEX_BOT__SERVER__PORT");
        env::remove_var("JENKINS_LEX_BOT__POLLING__INTERVAL_SECS");
        env::remove_var("JENKINS_LEX_BOT__POLLING__MAX_WAIT_SECS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.jenkins.url, "http://jenkins:8080");
        assert_eq!(config.jenkins.username, "bot");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_timeout_must_cover_build_wait() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let mut config = result.unwrap();
        assert_eq!(config.build_wait_secs(), 630);

        config.server.request_timeout_secs = 600;
        assert_eq!(
            config.validate(),
            Err(ValidationError::RequestTimeoutBelowBuildWait(630))
        );

        config.server.request_timeout_secs = 631;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_jenkins_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.jenkins.timeout_secs, 30);
        assert_eq!(config.polling.interval_secs, 60);
        assert_eq!(config.polling.max_wait_secs, 600);
    }

    #[test]
    fn test_custom_polling() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("JENKINS_LEX_BOT__POLLING__INTERVAL_SECS", "10");
        env::set_var("JENKINS_LEX_BOT__POLLING__MAX_WAIT_SECS", "120");
        env::set_var("JENKINS_LEX_BOT__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);

        let settings = config.handler_settings();
        assert_eq!(settings.server_base, "http://jenkins:8080");
        assert_eq!(settings.polling.interval, Duration::from_secs(10));
        assert_eq!(settings.polling.max_wait, Duration::from_secs(120));
    }
}
