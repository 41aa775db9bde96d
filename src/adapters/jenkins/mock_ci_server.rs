//! Mock CI Server for testing.
//!
//! Provides an in-memory implementation of the CiServer port so handlers
//! and the intent router can be exercised without a Jenkins instance.
//!
//! # Features
//!
//! - Jobs with console logs per build
//! - Scripted build-info sequences for polling tests
//! - Error injection per operation
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let ci = MockCiServer::new()
//!     .with_job(JobInfo::new("api").with_last_build(3))
//!     .with_build_sequence(vec![BuildInfo::building(4), BuildInfo::finished(4, "SUCCESS")]);
//!
//! let number = ci.build_job(&JobName::new("api")?).await?;
//! assert_eq!(ci.call_count(CiOperation::BuildJob), 1);
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::foundation::{BuildNumber, JobName};
use crate::ports::{BuildInfo, CiError, CiServer, JobInfo, JobSummary};

/// Operations of the CiServer port, for call tracking and error injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CiOperation {
    JobExists,
    GetJobInfo,
    CreateJob,
    DeleteJob,
    BuildJob,
    GetBuildInfo,
    GetJobs,
    GetConsoleOutput,
}

#[derive(Debug, Default)]
struct MockState {
    jobs: BTreeMap<String, MockJob>,
    build_sequence: VecDeque<BuildInfo>,
    failures: HashMap<CiOperation, CiError>,
    calls: Vec<CiOperation>,
}

#[derive(Debug, Clone)]
struct MockJob {
    info: JobInfo,
    config_xml: Option<String>,
    console: HashMap<BuildNumber, String>,
}

/// Mock CI server for testing.
///
/// Clones share state, so a test can keep one handle for assertions while
/// handing another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockCiServer {
    state: Arc<Mutex<MockState>>,
}

impl MockCiServer {
    /// Creates an empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing job.
    pub fn with_job(self, info: JobInfo) -> Self {
        self.state().jobs.insert(
            info.name.clone(),
            MockJob {
                info,
                config_xml: None,
                console: HashMap::new(),
            },
        );
        self
    }

    /// Sets the console log of one build of an existing job.
    pub fn with_console_output(
        self,
        job: &str,
        number: u64,
        output: impl Into<String>,
    ) -> Self {
        if let Some(mock_job) = self.state().jobs.get_mut(job) {
            mock_job
                .console
                .insert(BuildNumber::new(number), output.into());
        }
        self
    }

    /// Queues the answers to successive `get_build_info` calls.
    ///
    /// The last entry keeps being returned once the queue is drained. With
    /// nothing queued, builds report SUCCESS.
    pub fn with_build_sequence(self, infos: Vec<BuildInfo>) -> Self {
        self.state().build_sequence = infos.into();
        self
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn with_failure(self, operation: CiOperation, error: CiError) -> Self {
        self.state().failures.insert(operation, error);
        self
    }

    /// Returns the number of calls made to one operation.
    pub fn call_count(&self, operation: CiOperation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    /// Returns every call in order.
    pub fn calls(&self) -> Vec<CiOperation> {
        self.state().calls.clone()
    }

    /// Names of the jobs currently on the server.
    pub fn job_names(&self) -> Vec<String> {
        self.state().jobs.keys().cloned().collect()
    }

    /// The `config.xml` a job was created with.
    pub fn config_xml(&self, job: &str) -> Option<String> {
        self.state()
            .jobs
            .get(job)
            .and_then(|j| j.config_xml.clone())
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records the call and returns the injected failure, if any.
    fn record(&self, operation: CiOperation) -> Result<MutexGuard<'_, MockState>, CiError> {
        let mut state = self.state();
        state.calls.push(operation);
        if let Some(err) = state.failures.get(&operation).cloned() {
            return Err(err);
        }
        Ok(state)
    }
}

fn job_not_found(job: &JobName) -> CiError {
    CiError::not_found(format!("job '{}'", job))
}

#[async_trait]
impl CiServer for MockCiServer {
    async fn job_exists(&self, job: &JobName) -> Result<bool, CiError> {
        let state = self.record(CiOperation::JobExists)?;
        Ok(state.jobs.contains_key(job.as_str()))
    }

    async fn get_job_info(&self, job: &JobName) -> Result<JobInfo, CiError> {
        let state = self.record(CiOperation::GetJobInfo)?;
        state
            .jobs
            .get(job.as_str())
            .map(|j| j.info.clone())
            .ok_or_else(|| job_not_found(job))
    }

    async fn create_job(&self, job: &JobName, config_xml: &str) -> Result<(), CiError> {
        let mut state = self.record(CiOperation::CreateJob)?;
        if state.jobs.contains_key(job.as_str()) {
            return Err(CiError::remote(
                400,
                format!("A job already exists with the name '{}'", job),
            ));
        }
        state.jobs.insert(
            job.to_string(),
            MockJob {
                info: JobInfo::new(job.as_str()),
                config_xml: Some(config_xml.to_string()),
                console: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_job(&self, job: &JobName) -> Result<(), CiError> {
        let mut state = self.record(CiOperation::DeleteJob)?;
        state
            .jobs
            .remove(job.as_str())
            .map(|_| ())
            .ok_or_else(|| job_not_found(job))
    }

    async fn build_job(&self, job: &JobName) -> Result<BuildNumber, CiError> {
        let mut state = self.record(CiOperation::BuildJob)?;
        let mock_job = state
            .jobs
            .get_mut(job.as_str())
            .ok_or_else(|| job_not_found(job))?;
        let next = mock_job.info.last_build.map_or(1, |n| n.value() + 1);
        mock_job.info.last_build = Some(BuildNumber::new(next));
        Ok(BuildNumber::new(next))
    }

    async fn get_build_info(
        &self,
        job: &JobName,
        number: BuildNumber,
    ) -> Result<BuildInfo, CiError> {
        let mut state = self.record(CiOperation::GetBuildInfo)?;
        if !state.jobs.contains_key(job.as_str()) {
            return Err(job_not_found(job));
        }
        let scripted = if state.build_sequence.len() > 1 {
            state.build_sequence.pop_front()
        } else {
            state.build_sequence.front().cloned()
        };
        let mut info = scripted.unwrap_or_else(|| BuildInfo::finished(number.value(), "SUCCESS"));
        info.number = number;
        Ok(info)
    }

    async fn get_jobs(&self) -> Result<Vec<JobSummary>, CiError> {
        let state = self.record(CiOperation::GetJobs)?;
        Ok(state
            .jobs
            .values()
            .map(|j| JobSummary {
                name: j.info.name.clone(),
                url: j.info.url.clone(),
                color: j.info.color.clone(),
            })
            .collect())
    }

    async fn get_build_console_output(
        &self,
        job: &JobName,
        number: BuildNumber,
    ) -> Result<String, CiError> {
        let state = self.record(CiOperation::GetConsoleOutput)?;
        let mock_job = state
            .jobs
            .get(job.as_str())
            .ok_or_else(|| job_not_found(job))?;
        mock_job
            .console
            .get(&number)
            .cloned()
            .ok_or_else(|| CiError::not_found(format!("build #{} of job '{}'", number, job)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> JobName {
        JobName::new(s).unwrap()
    }

    #[tokio::test]
    async fn tracks_calls_per_operation() {
        let ci = MockCiServer::new().with_job(JobInfo::new("api"));

        assert!(ci.job_exists(&name("api")).await.unwrap());
        assert!(!ci.job_exists(&name("web")).await.unwrap());
        ci.get_jobs().await.unwrap();

        assert_eq!(ci.call_count(CiOperation::JobExists), 2);
        assert_eq!(ci.call_count(CiOperation::GetJobs), 1);
        assert_eq!(
            ci.calls(),
            vec![
                CiOperation::JobExists,
                CiOperation::JobExists,
                CiOperation::GetJobs
            ]
        );
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let ci = MockCiServer::new();
        ci.create_job(&name("api"), "<project/>").await.unwrap();
        let err = ci.create_job(&name("api"), "<project/>").await.unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(ci.config_xml("api").as_deref(), Some("<project/>"));
    }

    #[tokio::test]
    async fn build_numbers_increase() {
        let ci = MockCiServer::new().with_job(JobInfo::new("api").with_last_build(9));
        assert_eq!(ci.build_job(&name("api")).await.unwrap(), BuildNumber::new(10));
        assert_eq!(ci.build_job(&name("api")).await.unwrap(), BuildNumber::new(11));
    }

    #[tokio::test]
    async fn build_sequence_repeats_last_entry() {
        let ci = MockCiServer::new()
            .with_job(JobInfo::new("api"))
            .with_build_sequence(vec![BuildInfo::building(1), BuildInfo::finished(1, "FAILURE")]);
        let job = name("api");
        let n = BuildNumber::new(1);

        assert!(ci.get_build_info(&job, n).await.unwrap().building);
        assert!(!ci.get_build_info(&job, n).await.unwrap().building);
        assert!(!ci.get_build_info(&job, n).await.unwrap().building);
    }

    #[tokio::test]
    async fn injected_failures_are_returned() {
        let ci = MockCiServer::new().with_failure(CiOperation::GetJobs, CiError::Unauthorized);
        assert_eq!(ci.get_jobs().await.unwrap_err(), CiError::Unauthorized);
        assert_eq!(ci.call_count(CiOperation::GetJobs), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let ci = MockCiServer::new();
        let handle = ci.clone();
        ci.create_job(&name("api"), "<project/>").await.unwrap();
        assert_eq!(handle.job_names(), vec!["api".to_string()]);
    }
}
