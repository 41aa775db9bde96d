//! GetLastBuildInfoHandler - Query handler for a job's most recent build.

use std::sync::Arc;

use crate::domain::foundation::JobName;
use crate::domain::jobs::build_url;
use crate::ports::{BuildInfo, CiServer};

use super::{require_job, JobOperationError};

/// Query for the last build of a job.
#[derive(Debug, Clone)]
pub struct GetLastBuildInfoQuery {
    pub job_name: JobName,
}

/// The most recent build, if the job has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastBuild {
    NoBuilds,
    Build { info: BuildInfo, url: String },
}

/// Handler for last-build status.
pub struct GetLastBuildInfoHandler {
    ci: Arc<dyn CiServer>,
    server_base: String,
}

impl GetLastBuildInfoHandler {
    pub fn new(ci: Arc<dyn CiServer>, server_base: impl Into<String>) -> Self {
        Self {
            ci,
            server_base: server_base.into(),
        }
    }

    pub async fn execute(&self, query: &GetLastBuildInfoQuery) -> Result<LastBuild, JobOperationError> {
        let job = &query.job_name;
        require_job(self.ci.as_ref(), job).await?;

        let Some(number) = self.ci.get_job_info(job).await?.last_build else {
            return Ok(LastBuild::NoBuilds);
        };

        let info = self.ci.get_build_info(job, number).await?;
        Ok(LastBuild::Build {
            info,
            url: build_url(&self.server_base, job, number),
        })
    }

    pub async fn handle(&self, query: GetLastBuildInfoQuery) -> String {
        let job = &query.job_name;
        match self.execute(&query).await {
            Ok(LastBuild::NoBuilds) => format!(
                "Job '{}' hasn't been built yet. Ask me to build it whenever you're ready!",
                job
            ),
            Ok(LastBuild::Build { info, url }) if info.building => format!(
                "Build #{} of job '{}' is still running. Follow along here: {}.",
                info.number, job, url
            ),
            Ok(LastBuild::Build { info, url }) => format!(
                "The last build for job '{}' has status: {}. Check out the details here: {}.",
                job,
                info.terminal_result(),
                url
            ),
            Err(JobOperationError::NotFound { job, suggestion }) => JobOperationError::not_found_reply(
                format!("Job '{}' doesn’t seem to exist. Can you double-check the name?", job),
                &suggestion,
            ),
            Err(err) => {
                tracing::warn!(job = %job, "Last build info failed: {}", err);
                format!(
                    "Oops, there was an issue retrieving the last build info for job '{}'. Here's the error: {}",
                    job, err
                )
            }
        }
    }
}
