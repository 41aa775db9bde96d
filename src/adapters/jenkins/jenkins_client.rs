//! Jenkins Client - Implementation of CiServer for Jenkins' REST API.
//!
//! Talks to the JSON API (`/api/json`) with HTTP basic authentication using a
//! username and API token. API-token requests do not need a CSRF crumb.
//!
//! # Configuration
//!
//! ```ignore
//! let config = JenkinsConfig::new("https://ci.example.com", "bot", api_token)
//!     .with_timeout(Duration::from_secs(30))
//!     .with_queue_polling(30, Duration::from_secs(1));
//!
//! let client = JenkinsClient::new(config)?;
//! ```
//!
//! # Triggering builds
//!
//! `POST /job/{name}/build` answers with a queue item, not a build. The
//! client follows the `Location` header to the queue item and waits until
//! Jenkins assigns it an executable, which carries the build number.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::{BuildNumber, JobName};
use crate::domain::jobs::BuildResult;
use crate::ports::{BuildInfo, CiError, CiServer, JobInfo, JobSummary};

/// Longest error body quoted back to the user.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Configuration for the Jenkins client.
#[derive(Debug, Clone)]
pub struct JenkinsConfig {
    /// Server root, e.g. `http://jenkins:8080` or `https://host/jenkins`.
    pub base_url: String,
    /// User the API token belongs to.
    pub username: String,
    /// API token for authentication.
    api_token: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// How many times to look at a queue item before giving up.
    pub queue_poll_attempts: u32,
    /// Delay between queue item checks.
    pub queue_poll_interval: Duration,
}

impl JenkinsConfig {
    /// Creates a new configuration with default timeouts.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            api_token: Secret::new(api_token.into()),
            timeout: Duration::from_secs(30),
            queue_poll_attempts: 30,
            queue_poll_interval: Duration::from_secs(1),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how long to wait for a queued build to start.
    pub fn with_queue_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.queue_poll_attempts = attempts;
        self.queue_poll_interval = interval;
        self
    }

    /// Exposes the API token (for making requests).
    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// Jenkins REST API client.
pub struct JenkinsClient {
    config: JenkinsConfig,
    base: Url,
    client: Client,
}

impl JenkinsClient {
    /// Creates a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns `CiError::InvalidResponse` if the base URL cannot be parsed and
    /// `CiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: JenkinsConfig) -> Result<Self, CiError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            CiError::invalid_response(format!("invalid Jenkins URL '{}': {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(CiError::invalid_response(format!(
                "invalid Jenkins URL '{}'",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CiError::transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base,
            client,
        })
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Builds `{base}/job/{job}/{segments...}`.
    fn job_endpoint(&self, job: &JobName, segments: &[&str]) -> Url {
        let mut all = vec!["job", job.as_str()];
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }

    /// Adds credentials, sends the request and maps the status.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, CiError> {
        let response = request
            .basic_auth(&self.config.username, Some(self.config.api_token()))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CiError::transport(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    CiError::transport(format!("connection failed: {}", e))
                } else {
                    CiError::transport(e.to_string())
                }
            })?;

        Self::handle_response_status(response, what).await
    }

    /// Maps error statuses to `CiError`s.
    async fn handle_response_status(response: Response, what: &str) -> Result<Response, CiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Jenkins explains most rejections in an X-Error header.
        let header_error = response
            .headers()
            .get("X-Error")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::NOT_FOUND => Err(CiError::not_found(what)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CiError::Unauthorized),
            _ => {
                let message = header_error.unwrap_or_else(|| {
                    let body = body.trim();
                    if body.is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("unknown error")
                            .to_string()
                    } else {
                        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
                    }
                });
                tracing::warn!("Jenkins rejected request for {}: {} {}", what, status, message);
                Err(CiError::remote(status.as_u16(), message))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, CiError> {
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url), what).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CiError::invalid_response(format!("failed to parse {}: {}", what, e)))
    }

    /// Extracts the queue item id from a `Location: .../queue/item/{id}/` header.
    fn queue_item_id(location: &str) -> Option<u64> {
        let url = Url::parse(location).ok()?;
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty()).rev();
        let id = segments.next()?.parse().ok()?;
        match (segments.next(), segments.next()) {
            (Some("item"), Some("queue")) => Some(id),
            _ => None,
        }
    }

    /// Waits for a queue item to turn into a build.
    async fn wait_for_build_number(
        &self,
        job: &JobName,
        queue_id: u64,
    ) -> Result<BuildNumber, CiError> {
        let id = queue_id.to_string();
        let url = self.endpoint(&["queue", "item", &id, "api", "json"]);
        let what = format!("queue item {} of job '{}'", queue_id, job);

        for attempt in 0..self.config.queue_poll_attempts {
            let item: QueueItemJson = self.get_json(url.clone(), &what).await?;
            if let Some(executable) = item.executable {
                tracing::debug!(
                    "Queue item {} became build #{} after {} checks",
                    queue_id,
                    executable.number,
                    attempt + 1
                );
                return Ok(BuildNumber::new(executable.number));
            }
            if item.cancelled {
                return Err(CiError::remote(
                    409,
                    format!("the queued build of '{}' was cancelled", job),
                ));
            }
            if let Some(why) = item.why.as_deref() {
                tracing::debug!("Queue item {} waiting: {}", queue_id, why);
            }
            sleep(self.config.queue_poll_interval).await;
        }

        Err(CiError::StillQueued(format!("job '{}'", job)))
    }
}

#[async_trait]
impl CiServer for JenkinsClient {
    async fn job_exists(&self, job: &JobName) -> Result<bool, CiError> {
        let mut url = self.job_endpoint(job, &["api", "json"]);
        url.query_pairs_mut().append_pair("tree", "name");

        match self
            .get_json::<serde_json::Value>(url, &format!("job '{}'", job))
            .await
        {
            Ok(_) => Ok(true),
            Err(CiError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn get_job_info(&self, job: &JobName) -> Result<JobInfo, CiError> {
        let url = self.job_endpoint(job, &["api", "json"]);
        let job_json: JobJson = self.get_json(url, &format!("job '{}'", job)).await?;
        Ok(job_json.into())
    }

    async fn create_job(&self, job: &JobName, config_xml: &str) -> Result<(), CiError> {
        let mut url = self.endpoint(&["createItem"]);
        url.query_pairs_mut().append_pair("name", job.as_str());
        tracing::debug!("POST {}", url);

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/xml")
            .body(config_xml.to_string());
        self.send(request, &format!("job '{}'", job)).await?;
        tracing::info!("Created Jenkins job '{}'", job);
        Ok(())
    }

    async fn delete_job(&self, job: &JobName) -> Result<(), CiError> {
        let url = self.job_endpoint(job, &["doDelete"]);
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url), &format!("job '{}'", job))
            .await?;
        tracing::info!("Deleted Jenkins job '{}'", job);
        Ok(())
    }

    async fn build_job(&self, job: &JobName) -> Result<BuildNumber, CiError> {
        let url = self.job_endpoint(job, &["build"]);
        tracing::debug!("POST {}", url);
        let response = self
            .send(self.client.post(url), &format!("job '{}'", job))
            .await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CiError::invalid_response("build trigger returned no queue location"))?;
        let queue_id = Self::queue_item_id(location).ok_or_else(|| {
            CiError::invalid_response(format!("unrecognised queue location '{}'", location))
        })?;

        tracing::info!("Triggered build of '{}' (queue item {})", job, queue_id);
        self.wait_for_build_number(job, queue_id).await
    }

    async fn get_build_info(
        &self,
        job: &JobName,
        number: BuildNumber,
    ) -> Result<BuildInfo, CiError> {
        let n = number.to_string();
        let url = self.job_endpoint(job, &[n.as_str(), "api", "json"]);
        let build: BuildJson = self
            .get_json(url, &format!("build #{} of job '{}'", number, job))
            .await?;
        Ok(build.into())
    }

    async fn get_jobs(&self) -> Result<Vec<JobSummary>, CiError> {
        let mut url = self.endpoint(&["api", "json"]);
        url.query_pairs_mut().append_pair("tree", "jobs[name,url,color]");
        let listing: JobsJson = self.get_json(url, "job list").await?;
        Ok(listing
            .jobs
            .into_iter()
            .map(|j| JobSummary {
                name: j.name,
                url: j.url,
                color: j.color,
            })
            .collect())
    }

    async fn get_build_console_output(
        &self,
        job: &JobName,
        number: BuildNumber,
    ) -> Result<String, CiError> {
        let n = number.to_string();
        let url = self.job_endpoint(job, &[n.as_str(), "consoleText"]);
        tracing::debug!("GET {}", url);
        let what = format!("build #{} of job '{}'", number, job);
        let response = self.send(self.client.get(url), &what).await?;
        response
            .text()
            .await
            .map_err(|e| CiError::transport(format!("failed to read console of {}: {}", what, e)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Jenkins JSON API types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobJson {
    name: String,
    url: Option<String>,
    description: Option<String>,
    buildable: Option<bool>,
    color: Option<String>,
    #[serde(default)]
    in_queue: bool,
    last_build: Option<BuildRefJson>,
    last_successful_build: Option<BuildRefJson>,
    last_failed_build: Option<BuildRefJson>,
    #[serde(default)]
    health_report: Vec<HealthReportJson>,
}

impl From<JobJson> for JobInfo {
    fn from(job: JobJson) -> Self {
        JobInfo {
            name: job.name,
            url: job.url,
            description: job.description,
            buildable: job.buildable.unwrap_or(true),
            color: job.color,
            in_queue: job.in_queue,
            last_build: job.last_build.map(|b| BuildNumber::new(b.number)),
            last_successful_build: job.last_successful_build.map(|b| BuildNumber::new(b.number)),
            last_failed_build: job.last_failed_build.map(|b| BuildNumber::new(b.number)),
            health: job
                .health_report
                .into_iter()
                .find_map(|h| h.description),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildRefJson {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct HealthReportJson {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuildJson {
    number: u64,
    #[serde(default)]
    building: bool,
    result: Option<String>,
    url: Option<String>,
    duration: Option<u64>,
}

impl From<BuildJson> for BuildInfo {
    fn from(build: BuildJson) -> Self {
        BuildInfo {
            number: BuildNumber::new(build.number),
            building: build.building,
            result: build.result.map(BuildResult::from),
            url: build.url,
            duration_ms: build.duration,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JobsJson {
    #[serde(default)]
    jobs: Vec<JobSummaryJson>,
}

#[derive(Debug, Deserialize)]
struct JobSummaryJson {
    name: String,
    url: Option<String>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueueItemJson {
    #[serde(default)]
    cancelled: bool,
    executable: Option<BuildRefJson>,
    why: Option<String>,
}
