//! ListJobsHandler - Query handler for the job listing.

use std::sync::Arc;

use crate::ports::CiServer;

use super::JobOperationError;

/// Handler for listing jobs.
pub struct ListJobsHandler {
    ci: Arc<dyn CiServer>,
}

impl ListJobsHandler {
    pub fn new(ci: Arc<dyn CiServer>) -> Self {
        Self { ci }
    }

    /// Returns job names in server order.
    pub async fn execute(&self) -> Result<Vec<String>, JobOperationError> {
        let jobs = self.ci.get_jobs().await?;
        Ok(jobs.into_iter().map(|job| job.name).collect())
    }

    pub async fn handle(&self) -> String {
        match self.execute().await {
            Ok(names) => format!(
                "Here are the available Jenkins jobs: {}. Let me know which one you’d like to work with.",
                names.join(", ")
            ),
            Err(err) => {
                tracing::warn!("Listing jobs failed: {}", err);
                format!(
                    "Oops! I couldn't retrieve the list of jobs. Here's the error: {}.",
                    err
                )
            }
        }
    }
}
