//! # Validation Errors
//!
//! Client-caused input errors. Each variant names the first rule a payload
//! violated; none of them is ever retried.

use thiserror::Error;

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation errors, in the order the rules are checked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No request body supplied
    #[error("Request body is required")]
    MissingBody,

    /// Body present but not a JSON object (or not JSON at all)
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Create without a usable title
    #[error("Missing required field: title")]
    MissingTitle,

    /// Update supplied a title that trims to nothing
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// Update supplied keys outside the allow-list
    #[error("Invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),

    /// A field carried the wrong JSON type
    #[error("Invalid type for field: {0}")]
    InvalidFieldType(&'static str),

    #[error("Invalid priority. Must be one of: low, medium, high")]
    InvalidPriority,

    #[error("Invalid status. Must be one of: pending, completed, archived")]
    InvalidStatus,

    #[error("Invalid dueDate format. Expected YYYY-MM-DD")]
    InvalidDueDateFormat,

    /// Bulk payload without its item array
    #[error("Request body must contain a non-empty '{0}' array")]
    MissingItems(&'static str),

    /// Bulk payload over the per-request limit
    #[error("Batch size {actual} exceeds maximum of {max} items")]
    BatchTooLarge { max: usize, actual: usize },
}

impl ValidationError {
    /// Offending keys for `InvalidFields`, used in the error body
    pub fn invalid_fields(&self) -> Option<&[String]> {
        match self {
            ValidationError::InvalidFields(fields) => Some(fields),
            _ => None,
        }
    }
}
