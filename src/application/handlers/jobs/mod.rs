//! Job operation handlers.
//!
//! Each handler has two entry points:
//! - `execute` returns a typed outcome or a [`JobOperationError`]
//! - `handle` turns either into the sentence the bot says back
//!
//! `handle` never fails: remote failures become apologetic replies that
//! quote the server's error text.

mod create_job;
mod delete_job;
mod get_build_logs;
mod get_job_info;
mod get_last_build_info;
mod list_jobs;
mod trigger_build;

pub use create_job::{CreateJobCommand, CreateJobHandler};
pub use delete_job::{DeleteJobCommand, DeleteJobHandler, DeleteJobResult};
pub use get_build_logs::{
    truncate_log, BuildLogs, GetBuildLogsHandler, GetBuildLogsQuery, MAX_LOG_CHARS,
    TRUNCATION_MARKER,
};
pub use get_job_info::{GetJobInfoHandler, GetJobInfoQuery};
pub use get_last_build_info::{GetLastBuildInfoHandler, GetLastBuildInfoQuery, LastBuild};
pub use list_jobs::ListJobsHandler;
pub use trigger_build::{PollingPolicy, TriggerBuildCommand, TriggerBuildHandler};

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{JobName, ValidationError};
use crate::domain::intent::SpellingCorrector;
use crate::ports::{CiError, CiServer};

/// Errors from job operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobOperationError {
    /// The target job does not exist.
    #[error("job '{job}' not found")]
    NotFound {
        job: JobName,
        /// Closest existing job name, if one is close enough.
        suggestion: Option<String>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] CiError),
}

impl JobOperationError {
    /// Appends a "did you mean" hint to a not-found reply.
    fn not_found_reply(base: String, suggestion: &Option<String>) -> String {
        match suggestion {
            Some(name) => format!("{} Did you mean '{}'?", base, name),
            None => base,
        }
    }
}

/// Fails with `NotFound` unless the job exists on the server.
///
/// On a miss, the job list is consulted (best effort) for a similarly
/// spelled name to suggest.
async fn require_job(ci: &dyn CiServer, job: &JobName) -> Result<(), JobOperationError> {
    if ci.job_exists(job).await? {
        return Ok(());
    }

    tracing::debug!("Job '{}' not found", job);
    Err(JobOperationError::NotFound {
        job: job.clone(),
        suggestion: suggest_job_name(ci, job).await,
    })
}

async fn suggest_job_name(ci: &dyn CiServer, job: &JobName) -> Option<String> {
    match ci.get_jobs().await {
        Ok(jobs) => {
            let corrector = SpellingCorrector::new(jobs.into_iter().map(|j| j.name));
            corrector
                .correction(job.as_str())
                .filter(|candidate| *candidate != job.as_str())
                .map(str::to_string)
        }
        Err(err) => {
            tracing::debug!("Could not list jobs for a suggestion: {}", err);
            None
        }
    }
}

/// Settings shared by the job handlers.
#[derive(Debug, Clone)]
pub struct JobHandlerSettings {
    /// Server root used in build links.
    pub server_base: String,
    /// How long to follow a triggered build.
    pub polling: PollingPolicy,
}

impl JobHandlerSettings {
    pub fn new(server_base: impl Into<String>) -> Self {
        Self {
            server_base: server_base.into(),
            polling: PollingPolicy::default(),
        }
    }

    pub fn with_polling(mut self, polling: PollingPolicy) -> Self {
        self.polling = polling;
        self
    }
}

/// Every job handler, wired to one CI server.
#[derive(Clone)]
pub struct JobHandlers {
    pub create: Arc<CreateJobHandler>,
    pub trigger_build: Arc<TriggerBuildHandler>,
    pub list: Arc<ListJobsHandler>,
    pub delete: Arc<DeleteJobHandler>,
    pub job_info: Arc<GetJobInfoHandler>,
    pub last_build_info: Arc<GetLastBuildInfoHandler>,
    pub build_logs: Arc<GetBuildLogsHandler>,
}

impl JobHandlers {
    pub fn new(ci: Arc<dyn CiServer>, settings: JobHandlerSettings) -> Self {
        Self {
            create: Arc::new(CreateJobHandler::new(ci.clone())),
            trigger_build: Arc::new(TriggerBuildHandler::new(
                ci.clone(),
                settings.server_base.clone(),
                settings.polling,
            )),
            list: Arc::new(ListJobsHandler::new(ci.clone())),
            delete: Arc::new(DeleteJobHandler::new(ci.clone())),
            job_info: Arc::new(GetJobInfoHandler::new(ci.clone())),
            last_build_info: Arc::new(GetLastBuildInfoHandler::new(
                ci.clone(),
                settings.server_base,
            )),
            build_logs: Arc::new(GetBuildLogsHandler::new(ci)),
        }
    }
}
