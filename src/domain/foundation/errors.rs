//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction and job validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Unknown job type, or a Multibranch job without a source repository.
    #[error("The job type '{0}' or missing GitHub URL for Multibranch is invalid")]
    InvalidJobType(String),
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid job type error.
    pub fn invalid_job_type(job_type: impl Into<String>) -> Self {
        ValidationError::InvalidJobType(job_type.into())
    }
}
