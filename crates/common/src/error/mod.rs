//! Common error types shared by the runtime utilities
//!
//! Modules that need richer context compose `CommonError` into their own
//! error enums (the domain crate maps it onto `SyncError::Cache`).

use thiserror::Error;

/// Errors raised by the shared runtime utilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Serialization or deserialization errors
    #[error("Serialization error ({format}): {message}")]
    Serialization { message: String, format: String },

    /// Data persistence errors (file I/O)
    #[error("Persistence error during {operation}: {message}")]
    Persistence { message: String, operation: String },
}

impl CommonError {
    /// Create a serialization error for the given data format
    pub fn serialization_format(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), format: format.into() }
    }

    /// Create a persistence error for the given operation
    pub fn persistence(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence { message: message.into(), operation: operation.into() }
    }
}

/// Result type for common utilities
pub type CommonResult<T> = Result<T, CommonError>;
