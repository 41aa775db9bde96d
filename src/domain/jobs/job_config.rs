//! Job definition documents in Jenkins' `config.xml` format.
//!
//! Each job variant is modelled as a typed value and only turned into XML
//! at the edge, with every interpolated value escaped. Nothing supplied by
//! a user is ever spliced into markup unescaped.

use std::borrow::Cow;

use crate::domain::foundation::ValidationError;

use super::JobType;

/// Placeholder script installed into new Pipeline jobs.
pub const PLACEHOLDER_PIPELINE_SCRIPT: &str = r#"pipeline {
    agent any
    stages {
        stage('Build') {
            steps {
                echo 'Building...'
            }
        }
    }
}"#;

/// Script path multibranch projects look for in each branch.
const MULTIBRANCH_SCRIPT_PATH: &str = "Jenkinsfile";

/// A validated job definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobConfig {
    /// Empty freestyle project.
    Freestyle,
    /// Pipeline job running an inline script.
    Pipeline { script: String },
    /// Multibranch pipeline discovering branches from one git repository.
    Multibranch { repository_url: String },
}

impl JobConfig {
    /// Builds a job definition from a spoken job type and optional repository URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJobType`] naming `job_type` when the type
    /// is unknown, or when a Multibranch job has no repository URL.
    pub fn build(job_type: &str, source_url: Option<&str>) -> Result<Self, ValidationError> {
        let parsed = job_type
            .parse::<JobType>()
            .map_err(|_| ValidationError::invalid_job_type(job_type))?;
        Self::for_type(parsed, source_url)
    }

    /// Builds a job definition for an already parsed job type.
    pub fn for_type(job_type: JobType, source_url: Option<&str>) -> Result<Self, ValidationError> {
        match job_type {
            JobType::Freestyle => Ok(JobConfig::Freestyle),
            JobType::Pipeline => Ok(JobConfig::Pipeline {
                script: PLACEHOLDER_PIPELINE_SCRIPT.to_string(),
            }),
            JobType::Multibranch => {
                let url = source_url
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| ValidationError::invalid_job_type(job_type.display_name()))?;
                Ok(JobConfig::Multibranch {
                    repository_url: url.to_string(),
                })
            }
        }
    }

    pub fn job_type(&self) -> JobType {
        match self {
            JobConfig::Freestyle => JobType::Freestyle,
            JobConfig::Pipeline { .. } => JobType::Pipeline,
            JobConfig::Multibranch { .. } => JobType::Multibranch,
        }
    }

    /// Serializes the definition into a `config.xml` document.
    pub fn to_xml(&self) -> String {
        match self {
            JobConfig::Freestyle => concat!(
                "<?xml version='1.1' encoding='UTF-8'?>\n",
                "<project>\n",
                "  <builders/>\n",
                "  <publishers/>\n",
                "  <buildWrappers/>\n",
                "</project>\n",
            )
            .to_string(),
            JobConfig::Pipeline { script } => format!(
                concat!(
                    "<?xml version='1.1' encoding='UTF-8'?>\n",
                    "<flow-definition plugin=\"workflow-job\">\n",
                    "  <definition class=\"org.jenkinsci.plugins.workflow.cps.CpsFlowDefinition\" plugin=\"workflow-cps\">\n",
                    "    <script>{}</script>\n",
                    "    <sandbox>true</sandbox>\n",
                    "  </definition>\n",
                    "</flow-definition>\n",
                ),
                escape_xml(script)
            ),
            JobConfig::Multibranch { repository_url } => format!(
                concat!(
                    "<?xml version='1.1' encoding='UTF-8'?>\n",
                    "<org.jenkinsci.plugins.workflow.multibranch.WorkflowMultiBranchProject plugin=\"workflow-multibranch\">\n",
                    "  <sources class=\"jenkins.branch.MultiBranchProject$BranchSourceList\" plugin=\"branch-api\">\n",
                    "    <data>\n",
                    "      <jenkins.branch.BranchSource>\n",
                    "        <source class=\"jenkins.plugins.git.GitSCMSource\" plugin=\"git\">\n",
                    "          <remote>{}</remote>\n",
                    "        </source>\n",
                    "      </jenkins.branch.BranchSource>\n",
                    "    </data>\n",
                    "  </sources>\n",
                    "  <factory class=\"org.jenkinsci.plugins.workflow.multibranch.WorkflowBranchProjectFactory\">\n",
                    "    <scriptPath>{}</scriptPath>\n",
                    "  </factory>\n",
                    "</org.jenkinsci.plugins.workflow.multibranch.WorkflowMultiBranchProject>\n",
                ),
                escape_xml(repository_url),
                MULTIBRANCH_SCRIPT_PATH
            ),
        }
    }
}

/// Escapes the five XML special characters.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freestyle_document_is_an_empty_project() {
        let xml = JobConfig::build("Freestyle", None).unwrap().to_xml();
        assert!(xml.contains("<project>"));
        assert!(xml.contains("<builders/>"));
    }

    #[test]
    fn pipeline_document_embeds_placeholder_script() {
        let config = JobConfig::build("Pipeline", None).unwrap();
        let xml = config.to_xml();
        assert!(xml.contains("CpsFlowDefinition"));
        assert!(xml.contains("stage(&apos;Build&apos;)"));
        assert_eq!(config.job_type(), JobType::Pipeline);
    }

    #[test]
    fn multibranch_document_contains_url_verbatim() {
        let url = "https://github.com/acme/widgets.git";
        let xml = JobConfig::build("Multibranch", Some(url)).unwrap().to_xml();
        assert!(xml.contains(url));
        assert!(xml.contains("jenkins.plugins.git.GitSCMSource"));
        assert_eq!(xml.matches("<jenkins.branch.BranchSource>").count(), 1);
    }

    #[test]
    fn multibranch_without_url_is_rejected() {
        let err = JobConfig::build("Multibranch", None).unwrap_err();
        assert_eq!(err, ValidationError::invalid_job_type("Multibranch"));

        assert!(JobConfig::build("Multibranch", Some("   ")).is_err());
    }

    #[test]
    fn unknown_type_is_rejected_by_name() {
        let err = JobConfig::build("Unknown", None).unwrap_err();
        assert_eq!(err, ValidationError::invalid_job_type("Unknown"));
        assert!(err.to_string().contains("Unknown"));
    }

    #[test]
    fn job_type_is_case_insensitive() {
        assert_eq!(
            JobConfig::build("freestyle", None).unwrap(),
            JobConfig::Freestyle
        );
    }

    #[test]
    fn markup_in_url_is_escaped() {
        let xml = JobConfig::build("Multibranch", Some("https://x/</remote><evil/>"))
            .unwrap()
            .to_xml();
        assert!(!xml.contains("<evil/>"));
        assert!(xml.contains("&lt;/remote&gt;&lt;evil/&gt;"));
    }

    #[test]
    fn escape_xml_borrows_clean_text() {
        assert!(matches!(escape_xml("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_xml("a&b"), "a&amp;b");
    }
}
