//! TriggerBuildHandler - Triggers a build and follows it to completion.
//!
//! After triggering, the build is polled every `interval` until it stops
//! building or `max_wait` has been spent waiting. In the second case the
//! caller gets `BuildOutcome::StillRunning` with a link to check later;
//! the build itself keeps going on the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::domain::foundation::JobName;
use crate::domain::jobs::{build_url, BuildOutcome, BuildResult};
use crate::ports::CiServer;

use super::{require_job, JobOperationError};

/// How a triggered build is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Pause between two status checks.
    pub interval: Duration,
    /// Total pause time before giving up on waiting.
    pub max_wait: Duration,
}

impl PollingPolicy {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_wait: Duration::from_secs(600),
        }
    }
}

/// Command to build a job.
#[derive(Debug, Clone)]
pub struct TriggerBuildCommand {
    pub job_name: JobName,
}

/// Handler for triggering and awaiting builds.
pub struct TriggerBuildHandler {
    ci: Arc<dyn CiServer>,
    server_base: String,
    polling: PollingPolicy,
}

impl TriggerBuildHandler {
    pub fn new(ci: Arc<dyn CiServer>, server_base: impl Into<String>, polling: PollingPolicy) -> Self {
        Self {
            ci,
            server_base: server_base.into(),
            polling,
        }
    }

    pub async fn execute(&self, cmd: &TriggerBuildCommand) -> Result<BuildOutcome, JobOperationError> {
        let job = &cmd.job_name;

        // 1. Job must exist
        require_job(self.ci.as_ref(), job).await?;

        // 2. Trigger
        let number = self.ci.build_job(job).await?;
        let url = build_url(&self.server_base, job, number);
        tracing::info!(job = %job, build = %number, "Build triggered");

        // 3. Poll until the build stops or the budget is spent
        let mut waited = Duration::ZERO;
        loop {
            let info = self.ci.get_build_info(job, number).await?;
            if !info.building {
                let result = info.terminal_result();
                tracing::info!(job = %job, build = %number, result = %result, "Build finished");
                return Ok(BuildOutcome::Finished { number, result, url });
            }

            if waited >= self.polling.max_wait || self.polling.interval.is_zero() {
                tracing::info!(
                    job = %job,
                    build = %number,
                    waited_secs = waited.as_secs(),
                    "Build still running, giving up waiting"
                );
                return Ok(BuildOutcome::StillRunning { number, url, waited });
            }

            let pause = self.polling.interval.min(self.polling.max_wait - waited);
            tracing::debug!(job = %job, build = %number, "Build running, checking again in {:?}", pause);
            sleep(pause).await;
            waited += pause;
        }
    }

    pub async fn handle(&self, cmd: TriggerBuildCommand) -> String {
        match self.execute(&cmd).await {
            Ok(BuildOutcome::Finished { result, url, .. }) => match result {
                BuildResult::Success => format!(
                    "All done! The build was a success 🎉. Check it out here: {}. Nice work!",
                    url
                ),
                BuildResult::Failure => format!(
                    "Oh no 😞, the build failed. Don't worry, you can check the details here: {}. Let's figure it out!",
                    url
                ),
                other => format!(
                    "Build finished with status: {}. Here’s the link: {}. Let's move on to the next task!",
                    other, url
                ),
            },
            Ok(BuildOutcome::StillRunning { number, url, waited }) => format!(
                "Build #{} of '{}' is still running after {} minute(s). Check back later for the result, or follow along here: {}",
                number,
                cmd.job_name,
                waited.as_secs() / 60,
                url
            ),
            Err(JobOperationError::NotFound { job, suggestion }) => JobOperationError::not_found_reply(
                format!(
                    "Hey, I couldn’t find a job named '{}' to build. Could you double-check the name?",
                    job
                ),
                &suggestion,
            ),
            Err(err) => {
                tracing::warn!(job = %cmd.job_name, "Build failed: {}", err);
                format!(
                    "Something went wrong while trying to build the job. Sorry about that! Here's the error: {}",
                    err
                )
            }
        }
    }
}
