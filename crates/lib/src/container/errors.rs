//! Error types for container operations.

use thiserror::Error;

/// Structured error types for container and value operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A value had a different shape than the caller asked for
    #[error("container type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// JSON text could not be parsed into a container
    #[error("malformed container document: {reason}")]
    MalformedDocument { reason: String },
}

impl ContainerError {
    /// Check if this error is a type mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(self, ContainerError::TypeMismatch { .. })
    }

    /// Check if this error is a document parse failure
    pub fn is_malformed(&self) -> bool {
        matches!(self, ContainerError::MalformedDocument { .. })
    }
}

impl From<ContainerError> for crate::Error {
    fn from(err: ContainerError) -> Self {
        crate::Error::Container(err)
    }
}
