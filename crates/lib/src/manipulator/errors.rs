//! Error types for manipulator and typed data operations.

use thiserror::Error;

/// Structured error types for typed attribute access.
///
/// These surface programmer errors at the call boundary. Data conditions a
/// caller can recover from (an undeclared key, a holder without the
/// attribute family) are reported through return-value shape instead and
/// never reach this enum.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DataError {
    /// A value's runtime shape disagreed with the key's declared type
    #[error("type mismatch for key '{key}': expected {expected}, found {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A key was used against a manipulator that does not declare it
    #[error("key '{key}' is not declared by {data}")]
    KeyNotDeclared { key: String, data: &'static str },
}

impl DataError {
    /// Check if this error is a type mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(self, DataError::TypeMismatch { .. })
    }

    /// Check if this error is an undeclared-key failure
    pub fn is_not_declared(&self) -> bool {
        matches!(self, DataError::KeyNotDeclared { .. })
    }
}

impl From<DataError> for crate::Error {
    fn from(err: DataError) -> Self {
        crate::Error::Data(err)
    }
}
