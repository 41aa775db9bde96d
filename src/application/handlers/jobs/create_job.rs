//! CreateJobHandler - Command handler for creating Jenkins jobs.

use std::sync::Arc;

use crate::domain::foundation::JobName;
use crate::domain::jobs::{JobConfig, JobType};
use crate::ports::CiServer;

use super::JobOperationError;

/// Command to create a job.
#[derive(Debug, Clone)]
pub struct CreateJobCommand {
    pub job_name: JobName,
    /// Job type as spoken; parsed case-insensitively.
    pub job_type: String,
    pub repository_url: Option<String>,
}

/// Handler for creating jobs.
pub struct CreateJobHandler {
    ci: Arc<dyn CiServer>,
}

impl CreateJobHandler {
    pub fn new(ci: Arc<dyn CiServer>) -> Self {
        Self { ci }
    }

    /// Builds the job definition and creates the job, returning its type.
    pub async fn execute(&self, cmd: &CreateJobCommand) -> Result<JobType, JobOperationError> {
        // 1. Validate type and repository into a typed definition
        let config = JobConfig::build(&cmd.job_type, cmd.repository_url.as_deref())?;

        // 2. Create on the server
        self.ci.create_job(&cmd.job_name, &config.to_xml()).await?;

        tracing::info!(
            job = %cmd.job_name,
            job_type = %config.job_type(),
            "Job created"
        );
        Ok(config.job_type())
    }

    pub async fn handle(&self, cmd: CreateJobCommand) -> String {
        match self.execute(&cmd).await {
            Ok(job_type) => format!(
                "Yay! Jenkins job '{}' of type '{}' has been created successfully. You're on fire!",
                cmd.job_name, job_type
            ),
            Err(JobOperationError::Validation(err)) => {
                format!("Oops! Something went wrong. {}.", err)
            }
            Err(err) => {
                tracing::warn!(job = %cmd.job_name, "Job creation failed: {}", err);
                format!(
                    "Oops, there was an issue creating the job: {}. Can you double-check the details?",
                    err
                )
            }
        }
    }
}
