//! CI Server Port - Interface to the remote continuous-integration server.
//!
//! This port abstracts every call the bot makes to Jenkins, so handlers can
//! branch on explicit outcomes instead of a client library's exception
//! hierarchy. Each operation returns `Ok(value)`, `Err(CiError::NotFound)`
//! or another `CiError` describing a remote failure.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct StaticServer;
//!
//! #[async_trait]
//! impl CiServer for StaticServer {
//!     async fn job_exists(&self, job: &JobName) -> Result<bool, CiError> {
//!         Ok(job.as_str() == "nightly")
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{BuildNumber, JobName};
use crate::domain::jobs::BuildResult;

/// Port for CI server interactions.
///
/// Implementations talk to a real server (see `JenkinsClient`) or simulate
/// one for tests (see `MockCiServer`).
#[async_trait]
pub trait CiServer: Send + Sync {
    /// Returns whether a job with this name exists.
    async fn job_exists(&self, job: &JobName) -> Result<bool, CiError>;

    /// Fetches job details. `CiError::NotFound` if the job does not exist.
    async fn get_job_info(&self, job: &JobName) -> Result<JobInfo, CiError>;

    /// Creates a job from a `config.xml` document.
    async fn create_job(&self, job: &JobName, config_xml: &str) -> Result<(), CiError>;

    /// Deletes a job.
    async fn delete_job(&self, job: &JobName) -> Result<(), CiError>;

    /// Triggers a build and returns the number it was assigned.
    async fn build_job(&self, job: &JobName) -> Result<BuildNumber, CiError>;

    /// Fetches the current state of one build.
    async fn get_build_info(
        &self,
        job: &JobName,
        number: BuildNumber,
    ) -> Result<BuildInfo, CiError>;

    /// Lists all top-level jobs.
    async fn get_jobs(&self) -> Result<Vec<JobSummary>, CiError>;

    /// Fetches the full console log of one build.
    async fn get_build_console_output(
        &self,
        job: &JobName,
        number: BuildNumber,
    ) -> Result<String, CiError>;
}

/// One entry of the job listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub name: String,
    pub url: Option<String>,
    /// Jenkins' ball colour (`blue`, `red`, `notbuilt`, ...).
    pub color: Option<String>,
}

/// Job details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub buildable: bool,
    pub color: Option<String>,
    pub in_queue: bool,
    pub last_build: Option<BuildNumber>,
    pub last_successful_build: Option<BuildNumber>,
    pub last_failed_build: Option<BuildNumber>,
    /// Description of the first health report entry, if any.
    pub health: Option<String>,
}

impl JobInfo {
    /// Creates a buildable job with no builds yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            description: None,
            buildable: true,
            color: None,
            in_queue: false,
            last_build: None,
            last_successful_build: None,
            last_failed_build: None,
            health: None,
        }
    }

    pub fn with_last_build(mut self, number: u64) -> Self {
        self.last_build = Some(BuildNumber::new(number));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// One-line, human-readable summary.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("name: {}", self.name)];
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            parts.push(format!("description: {}", description));
        }
        parts.push(format!("buildable: {}", if self.buildable { "yes" } else { "no" }));
        if self.in_queue {
            parts.push("queued: yes".to_string());
        }
        parts.push(match self.last_build {
            Some(n) => format!("last build: #{}", n),
            None => "last build: none".to_string(),
        });
        if let Some(n) = self.last_successful_build {
            parts.push(format!("last success: #{}", n));
        }
        if let Some(n) = self.last_failed_build {
            parts.push(format!("last failure: #{}", n));
        }
        if let Some(health) = &self.health {
            parts.push(format!("health: {}", health));
        }
        if let Some(url) = &self.url {
            parts.push(format!("url: {}", url));
        }
        parts.join(", ")
    }
}

/// State of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub number: BuildNumber,
    pub building: bool,
    /// Set once the build has finished; Jenkins reports `null` while running.
    pub result: Option<BuildResult>,
    pub url: Option<String>,
    pub duration_ms: Option<u64>,
}

impl BuildInfo {
    /// A build that is still running.
    pub fn building(number: u64) -> Self {
        Self {
            number: BuildNumber::new(number),
            building: true,
            result: None,
            url: None,
            duration_ms: None,
        }
    }

    /// A build that finished with the given result.
    pub fn finished(number: u64, result: impl Into<BuildResult>) -> Self {
        Self {
            number: BuildNumber::new(number),
            building: false,
            result: Some(result.into()),
            url: None,
            duration_ms: None,
        }
    }

    /// The result to report once the build has stopped.
    pub fn terminal_result(&self) -> BuildResult {
        self.result.clone().unwrap_or_else(BuildResult::unknown)
    }
}

/// Errors from CI server operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CiError {
    /// The job (or build) does not exist.
    #[error("{0} does not exist")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("authentication failed: check the Jenkins username and API token")]
    Unauthorized,

    /// The server answered with an error status.
    #[error("Jenkins returned {status}: {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Body or reason phrase.
        message: String,
    },

    /// The server could not be reached.
    #[error("network error: {0}")]
    Transport(String),

    /// The server's answer could not be understood.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// A triggered build never left the queue within the allotted attempts.
    #[error("build for {0} is still waiting in the queue")]
    StillQueued(String),
}

impl CiError {
    /// Creates a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a remote error from a status and message.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_result_defaults_to_unknown() {
        let info = BuildInfo {
            result: None,
            building: false,
            ..BuildInfo::building(4)
        };
        assert_eq!(info.terminal_result(), BuildResult::unknown());
        assert_eq!(
            BuildInfo::finished(4, "SUCCESS").terminal_result(),
            BuildResult::Success
        );
    }

    #[test]
    fn job_summary_lists_known_fields() {
        let info = JobInfo::new("api")
            .with_description("API tests")
            .with_last_build(12)
            .with_url("http://ci/job/api/");
        let summary = info.summary();
        assert!(summary.contains("name: api"));
        assert!(summary.contains("description: API tests"));
        assert!(summary.contains("last build: #12"));
        assert!(summary.contains("url: http://ci/job/api/"));
    }

    #[test]
    fn job_summary_without_builds() {
        let summary = JobInfo::new("fresh").summary();
        assert!(summary.contains("last build: none"));
        assert!(!summary.contains("description"));
    }

    #[test]
    fn ci_error_messages() {
        assert_eq!(
            CiError::remote(400, "A job already exists with the name 'api'").to_string(),
            "Jenkins returned 400: A job already exists with the name 'api'"
        );
        assert!(CiError::not_found("job 'x'").is_not_found());
        assert!(!CiError::Unauthorized.is_not_found());
    }
}
