//! Jobs module - Job definitions and build observations.
//!
//! - `JobType` - The three job flavours the bot knows how to create
//! - `JobConfig` - Typed job definition serialized to `config.xml`
//! - `BuildResult` / `BuildOutcome` - What a build ended as, or that it is still going

mod build;
mod job_config;
mod job_type;

pub use build::{build_url, BuildOutcome, BuildResult};
pub use job_config::{escape_xml, JobConfig, PLACEHOLDER_PIPELINE_SCRIPT};
pub use job_type::JobType;
