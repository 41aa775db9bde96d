//! Intents recognised from the conversational interface.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IntentName {
    CreateJenkinsJob,
    BuildJenkinsJob,
    ListJenkinsJobs,
    DeleteJenkinsJob,
    GetJobInfo,
    GetBuildLogs,
    GetLastBuildInfo,
    /// Anything the bot was not built for.
    Unknown(String),
}

impl IntentName {
    pub fn as_str(&self) -> &str {
        match self {
            IntentName::CreateJenkinsJob => "CreateJenkinsJob",
            IntentName::BuildJenkinsJob => "BuildJenkinsJob",
            IntentName::ListJenkinsJobs => "ListJenkinsJobs",
            IntentName::DeleteJenkinsJob => "DeleteJenkinsJob",
            IntentName::GetJobInfo => "GetJobInfo",
            IntentName::GetBuildLogs => "GetBuildLogs",
            IntentName::GetLastBuildInfo => "GetLastBuildInfo",
            IntentName::Unknown(name) => name,
        }
    }
}

impl From<&str> for IntentName {
    fn from(value: &str) -> Self {
        match value {
            "CreateJenkinsJob" => IntentName::CreateJenkinsJob,
            "BuildJenkinsJob" => IntentName::BuildJenkinsJob,
            "ListJenkinsJobs" => IntentName::ListJenkinsJobs,
            "DeleteJenkinsJob" => IntentName::DeleteJenkinsJob,
            "GetJobInfo" => IntentName::GetJobInfo,
            "GetBuildLogs" => IntentName::GetBuildLogs,
            "GetLastBuildInfo" => IntentName::GetLastBuildInfo,
            other => IntentName::Unknown(other.to_string()),
        }
    }
}

impl From<String> for IntentName {
    fn from(value: String) -> Self {
        IntentName::from(value.as_str())
    }
}

impl From<IntentName> for String {
    fn from(name: IntentName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for IntentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slot values the bot reads. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentSlots {
    pub job_name: Option<String>,
    pub job_type: Option<String>,
    pub repository_url: Option<String>,
    pub confirmation: Option<String>,
}

impl IntentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job_name(mut self, value: impl Into<String>) -> Self {
        self.job_name = non_blank(value.into());
        self
    }

    pub fn with_job_type(mut self, value: impl Into<String>) -> Self {
        self.job_type = non_blank(value.into());
        self
    }

    pub fn with_repository_url(mut self, value: impl Into<String>) -> Self {
        self.repository_url = non_blank(value.into());
        self
    }

    pub fn with_confirmation(mut self, value: impl Into<String>) -> Self {
        self.confirmation = non_blank(value.into());
        self
    }

    /// True when the user explicitly declined (`no`, `n`, `false`, `cancel`).
    pub fn is_declined(&self) -> bool {
        self.confirmation.as_deref().is_some_and(|c| {
            matches!(
                c.trim().to_ascii_lowercase().as_str(),
                "no" | "n" | "false" | "cancel"
            )
        })
    }
}

/// One conversational turn, reduced to what the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    pub intent: IntentName,
    pub slots: IntentSlots,
}

impl IntentRequest {
    pub fn new(intent: impl Into<IntentName>, slots: IntentSlots) -> Self {
        Self {
            intent: intent.into(),
            slots,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_intents() {
        assert_eq!(IntentName::from("GetBuildLogs"), IntentName::GetBuildLogs);
        assert_eq!(
            IntentName::from("CreateJenkinsJob"),
            IntentName::CreateJenkinsJob
        );
    }

    #[test]
    fn unknown_intent_keeps_its_name() {
        let name = IntentName::from("OrderPizza");
        assert_eq!(name, IntentName::Unknown("OrderPizza".to_string()));
        assert_eq!(name.to_string(), "OrderPizza");
    }

    #[test]
    fn blank_slot_values_are_absent() {
        let slots = IntentSlots::new().with_job_name("   ").with_job_type(" Pipeline ");
        assert_eq!(slots.job_name, None);
        assert_eq!(slots.job_type.as_deref(), Some("Pipeline"));
    }

    #[test]
    fn confirmation_decline_detection() {
        assert!(IntentSlots::new().with_confirmation("No").is_declined());
        assert!(IntentSlots::new().with_confirmation("cancel").is_declined());
        assert!(!IntentSlots::new().with_confirmation("Yes").is_declined());
        assert!(!IntentSlots::new().is_declined());
    }
}
