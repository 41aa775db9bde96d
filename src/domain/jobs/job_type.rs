//! JobType enum representing the job flavours the bot can create.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of Jenkins job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Freestyle,
    Pipeline,
    Multibranch,
}

impl JobType {
    /// Returns all job types in the order they are offered to users.
    pub fn all() -> &'static [JobType] {
        &[JobType::Freestyle, JobType::Pipeline, JobType::Multibranch]
    }

    /// Returns the display name, which is also the spoken slot value.
    pub fn display_name(&self) -> &'static str {
        match self {
            JobType::Freestyle => "Freestyle",
            JobType::Pipeline => "Pipeline",
            JobType::Multibranch => "Multibranch",
        }
    }

    /// Display names of every job type.
    pub fn vocabulary() -> Vec<&'static str> {
        Self::all().iter().map(JobType::display_name).collect()
    }

    /// Returns true if jobs of this type need a source repository.
    pub fn requires_repository(&self) -> bool {
        matches!(self, JobType::Multibranch)
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for JobType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.display_name().eq_ignore_ascii_case(candidate))
            .ok_or_else(|| ValidationError::invalid_job_type(s))
    }
}
