//! DeleteJobHandler - Command handler for deleting jobs.

use std::sync::Arc;

use crate::domain::foundation::JobName;
use crate::ports::CiServer;

use super::{require_job, JobOperationError};

/// Command to delete a job.
#[derive(Debug, Clone)]
pub struct DeleteJobCommand {
    pub job_name: JobName,
    /// The user answered no to the confirmation prompt.
    pub declined: bool,
}

/// What happened to the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteJobResult {
    Deleted,
    Cancelled,
}

/// Handler for deleting jobs.
pub struct DeleteJobHandler {
    ci: Arc<dyn CiServer>,
}

impl DeleteJobHandler {
    pub fn new(ci: Arc<dyn CiServer>) -> Self {
        Self { ci }
    }

    pub async fn execute(&self, cmd: &DeleteJobCommand) -> Result<DeleteJobResult, JobOperationError> {
        if cmd.declined {
            return Ok(DeleteJobResult::Cancelled);
        }

        require_job(self.ci.as_ref(), &cmd.job_name).await?;
        self.ci.delete_job(&cmd.job_name).await?;

        tracing::info!(job = %cmd.job_name, "Job deleted");
        Ok(DeleteJobResult::Deleted)
    }

    pub async fn handle(&self, cmd: DeleteJobCommand) -> String {
        match self.execute(&cmd).await {
            Ok(DeleteJobResult::Cancelled) => {
                format!("No problem, I won't delete job '{}'.", cmd.job_name)
            }
            Ok(DeleteJobResult::Deleted) => format!(
                "Job '{}' has been successfully deleted. It’s gone, but not forgotten!",
                cmd.job_name
            ),
            Err(JobOperationError::NotFound { job, suggestion }) => JobOperationError::not_found_reply(
                format!(
                    "Hey, I couldn’t find a job named '{}' to delete. Could you double-check the name?",
                    job
                ),
                &suggestion,
            ),
            Err(err) => {
                tracing::warn!(job = %cmd.job_name, "Delete failed: {}", err);
                format!(
                    "Sorry, I ran into an issue while trying to delete the job '{}'. Here's the error: {}",
                    cmd.job_name, err
                )
            }
        }
    }
}
