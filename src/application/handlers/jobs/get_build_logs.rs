//! GetBuildLogsHandler - Query handler for the last build's console log.

use std::sync::Arc;

use crate::domain::foundation::{BuildNumber, JobName};
use crate::ports::CiServer;

use super::{require_job, JobOperationError};

/// Longest log excerpt returned in a reply, in characters.
pub const MAX_LOG_CHARS: usize = 1000;

/// Appended to an excerpt that was cut short.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Cuts `log` to at most `max_chars` characters.
///
/// Returns the excerpt and whether anything was dropped.
pub fn truncate_log(log: &str, max_chars: usize) -> (&str, bool) {
    match log.char_indices().nth(max_chars) {
        Some((end, _)) => (&log[..end], true),
        None => (log, false),
    }
}

/// Query for the last build's log.
#[derive(Debug, Clone)]
pub struct GetBuildLogsQuery {
    pub job_name: JobName,
}

/// Console log of the last build, possibly truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildLogs {
    NoBuilds,
    Logs {
        number: BuildNumber,
        text: String,
        truncated: bool,
    },
}

/// Handler for build logs.
pub struct GetBuildLogsHandler {
    ci: Arc<dyn CiServer>,
}

impl GetBuildLogsHandler {
    pub fn new(ci: Arc<dyn CiServer>) -> Self {
        Self { ci }
    }

    pub async fn execute(&self, query: &GetBuildLogsQuery) -> Result<BuildLogs, JobOperationError> {
        let job = &query.job_name;
        require_job(self.ci.as_ref(), job).await?;

        let Some(number) = self.ci.get_job_info(job).await?.last_build else {
            return Ok(BuildLogs::NoBuilds);
        };

        let full = self.ci.get_build_console_output(job, number).await?;
        let (excerpt, truncated) = truncate_log(&full, MAX_LOG_CHARS);
        tracing::debug!(job = %job, build = %number, truncated, "Fetched console log");

        Ok(BuildLogs::Logs {
            number,
            text: excerpt.to_string(),
            truncated,
        })
    }

    pub async fn handle(&self, query: GetBuildLogsQuery) -> String {
        let job = &query.job_name;
        match self.execute(&query).await {
            Ok(BuildLogs::NoBuilds) => format!(
                "Job '{}' hasn't been built yet, so there are no logs to show.",
                job
            ),
            Ok(BuildLogs::Logs { text, truncated, .. }) => {
                let marker = if truncated { TRUNCATION_MARKER } else { "" };
                format!(
                    "Here are the logs for the last build of job '{}':\n{}{}. Let me know if you'd like to see more!",
                    job, text, marker
                )
            }
            Err(JobOperationError::NotFound { job, suggestion }) => JobOperationError::not_found_reply(
                format!("Job '{}' doesn’t seem to exist. Double-check the name, please!", job),
                &suggestion,
            ),
            Err(err) => {
                tracing::warn!(job = %job, "Fetching logs failed: {}", err);
                format!(
                    "Sorry, I couldn’t fetch the logs for the last build of job '{}'. Here's the error: {}",
                    job, err
                )
            }
        }
    }
}
