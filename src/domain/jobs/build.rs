//! Build results and outcomes as observed from the CI server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::domain::foundation::{BuildNumber, JobName};

/// Terminal result reported for a finished build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildResult {
    Success,
    Failure,
    /// ABORTED, UNSTABLE, NOT_BUILT or anything else the server reports.
    Other(String),
}

impl BuildResult {
    /// Result used when a build has stopped but reports no result.
    pub fn unknown() -> Self {
        BuildResult::Other("UNKNOWN".to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::Other(s) => s,
        }
    }
}

impl From<&str> for BuildResult {
    fn from(value: &str) -> Self {
        match value {
            "SUCCESS" => BuildResult::Success,
            "FAILURE" => BuildResult::Failure,
            other => BuildResult::Other(other.to_string()),
        }
    }
}

impl From<String> for BuildResult {
    fn from(value: String) -> Self {
        BuildResult::from(value.as_str())
    }
}

impl From<BuildResult> for String {
    fn from(result: BuildResult) -> Self {
        result.as_str().to_string()
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the bot knows about a triggered build once polling stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The build left the building state.
    Finished {
        number: BuildNumber,
        result: BuildResult,
        url: String,
    },
    /// The polling budget ran out while the build was still running.
    StillRunning {
        number: BuildNumber,
        url: String,
        waited: Duration,
    },
}

/// Human-facing link to a build: `{server_base}/job/{job}/{number}/`.
///
/// The job name is percent-encoded as one path segment.
pub fn build_url(server_base: &str, job: &JobName, number: BuildNumber) -> String {
    let number = number.to_string();
    match Url::parse(server_base) {
        Ok(mut url) if !url.cannot_be_a_base() => {
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty()
                    .extend(["job", job.as_str(), number.as_str(), ""]);
            }
            url.into()
        }
        _ => format!("{}/job/{}/{}/", server_base.trim_end_matches('/'), job, number),
    }
}
