//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the bot's domain.

mod errors;
mod ids;

pub use errors::ValidationError;
pub use ids::{BuildNumber, JobName};
