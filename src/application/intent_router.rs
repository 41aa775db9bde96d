//! Intent router - Validates slots and dispatches to the job handlers.
//!
//! Every turn produces exactly one reply. The router asks for the first
//! missing slot of the intent before anything reaches the CI server, and
//! catches misspelled job types with a "did you mean" reply.

use crate::domain::foundation::JobName;
use crate::domain::intent::{IntentName, IntentRequest, IntentSlots, SpellingCorrector};
use crate::domain::jobs::JobType;

use super::handlers::jobs::{
    CreateJobCommand, DeleteJobCommand, GetBuildLogsQuery, GetJobInfoQuery,
    GetLastBuildInfoQuery, JobHandlers, TriggerBuildCommand,
};

/// Reply for intents the bot does not handle.
pub const FALLBACK_REPLY: &str =
    "I’m sorry, I didn’t quite understand that. Can you please rephrase?";

/// Routes recognised intents to their handlers.
#[derive(Clone)]
pub struct IntentRouter {
    handlers: JobHandlers,
    job_types: SpellingCorrector,
}

impl IntentRouter {
    pub fn new(handlers: JobHandlers) -> Self {
        Self {
            handlers,
            job_types: SpellingCorrector::new(JobType::vocabulary()),
        }
    }

    /// Produces the reply for one turn.
    pub async fn route(&self, request: IntentRequest) -> String {
        let IntentRequest { intent, slots } = request;

        if let Some(reply) = self.check_job_type_spelling(&slots) {
            return reply;
        }

        match intent {
            IntentName::CreateJenkinsJob => self.create_job(slots).await,
            IntentName::BuildJenkinsJob => match job_name(&slots) {
                Some(job_name) => {
                    self.handlers
                        .trigger_build
                        .handle(TriggerBuildCommand { job_name })
                        .await
                }
                None => "I need the job name to trigger a build. Can you tell me which job you'd like to build?".to_string(),
            },
            IntentName::ListJenkinsJobs => self.handlers.list.handle().await,
            IntentName::DeleteJenkinsJob => match job_name(&slots) {
                Some(job_name) => {
                    self.handlers
                        .delete
                        .handle(DeleteJobCommand {
                            job_name,
                            declined: slots.is_declined(),
                        })
                        .await
                }
                None => "Please provide the name of the Jenkins job you’d like to delete.".to_string(),
            },
            IntentName::GetJobInfo => match job_name(&slots) {
                Some(job_name) => {
                    self.handlers
                        .job_info
                        .handle(GetJobInfoQuery { job_name })
                        .await
                }
                None => "I need the name of the job to get details. What job do you want to know about?".to_string(),
            },
            IntentName::GetBuildLogs => match job_name(&slots) {
                Some(job_name) => {
                    self.handlers
                        .build_logs
                        .handle(GetBuildLogsQuery { job_name })
                        .await
                }
                None => "Please provide the name of the Jenkins job to fetch build logs.".to_string(),
            },
            IntentName::GetLastBuildInfo => match job_name(&slots) {
                Some(job_name) => {
                    self.handlers
                        .last_build_info
                        .handle(GetLastBuildInfoQuery { job_name })
                        .await
                }
                None => "Which job's last build should I look up?".to_string(),
            },
            IntentName::Unknown(name) => {
                tracing::debug!(intent = %name, "Unrecognised intent");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn create_job(&self, slots: IntentSlots) -> String {
        let Some(job_name) = job_name(&slots) else {
            return "Hey! I need a job name to create the Jenkins job. What should I call it?"
                .to_string();
        };
        let Some(job_type) = slots.job_type else {
            return "Got it! Please tell me what type of Jenkins job it should be (Freestyle, Pipeline, or Multibranch)?".to_string();
        };
        let needs_repository = job_type
            .parse::<JobType>()
            .is_ok_and(|t| t.requires_repository());
        if needs_repository && slots.repository_url.is_none() {
            return "For a Multibranch job, I need a GitHub repository URL. Can you provide it?"
                .to_string();
        }

        self.handlers
            .create
            .handle(CreateJobCommand {
                job_name,
                job_type,
                repository_url: slots.repository_url,
            })
            .await
    }

    /// A "did you mean" reply when the job type is a near miss.
    ///
    /// Known types (any case) and values with no close match pass through.
    fn check_job_type_spelling(&self, slots: &IntentSlots) -> Option<String> {
        let job_type = slots.job_type.as_deref()?;
        let suggestion = self.job_types.suggest(job_type)?;
        Some(format!(
            "Hmm, looks like there's a typo in the job type '{}'. Did you mean '{}'? Let me know if I got that wrong!",
            job_type, suggestion
        ))
    }
}

fn job_name(slots: &IntentSlots) -> Option<JobName> {
    slots
        .job_name
        .as_deref()
        .and_then(|name| JobName::new(name).ok())
}
