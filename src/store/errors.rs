//! Store-level error types
//!
//! Only the conditional-write outcomes are distinguished; every transport or
//! backend fault collapses into `Unavailable`.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Conditional put found the key already present
    #[error("Todo already exists: {0}")]
    AlreadyExists(String),

    /// Conditional read/update/delete found no such key
    #[error("Todo not found: {0}")]
    NotFound(String),

    /// Any transport or backend fault
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
