//! Application handlers.
//!
//! Command and query handlers that orchestrate CI operations.

pub mod jobs;

pub use jobs::{JobHandlerSettings, JobHandlers, JobOperationError};
