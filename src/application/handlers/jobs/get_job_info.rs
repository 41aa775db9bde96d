//! GetJobInfoHandler - Query handler for job details.

use std::sync::Arc;

use crate::domain::foundation::JobName;
use crate::ports::{CiServer, JobInfo};

use super::{require_job, JobOperationError};

/// Query for one job's details.
#[derive(Debug, Clone)]
pub struct GetJobInfoQuery {
    pub job_name: JobName,
}

/// Handler for job details.
pub struct GetJobInfoHandler {
    ci: Arc<dyn CiServer>,
}

impl GetJobInfoHandler {
    pub fn new(ci: Arc<dyn CiServer>) -> Self {
        Self { ci }
    }

    pub async fn execute(&self, query: &GetJobInfoQuery) -> Result<JobInfo, JobOperationError> {
        require_job(self.ci.as_ref(), &query.job_name).await?;
        Ok(self.ci.get_job_info(&query.job_name).await?)
    }

    pub async fn handle(&self, query: GetJobInfoQuery) -> String {
        match self.execute(&query).await {
            Ok(info) => format!(
                "Here’s the info for job '{}': {}. Let me know if you need more details!",
                query.job_name,
                info.summary()
            ),
            Err(JobOperationError::NotFound { job, suggestion }) => JobOperationError::not_found_reply(
                format!("Job '{}' doesn’t seem to exist. Double-check the name, please!", job),
                &suggestion,
            ),
            Err(err) => {
                tracing::warn!(job = %query.job_name, "Job info failed: {}", err);
                format!(
                    "Sorry, I couldn’t retrieve job information for '{}'. Here's the error: {}",
                    query.job_name, err
                )
            }
        }
    }
}
