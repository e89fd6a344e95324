//! Error types for registry dispatch.

use thiserror::Error;

/// Structured error types for registry queries.
///
/// These mark bootstrap bugs: every key and manipulator type must be
/// registered before the registry is first queried. The common "this holder
/// does not support that attribute" case is not an error and comes back as
/// an absent value or a no-data transaction result.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A key id with no registered value processors was queried
    #[error("no value processors registered for key '{key}'")]
    UnregisteredKey { key: String },

    /// A manipulator type with no registered data processors was queried
    #[error("no data processors registered for manipulator '{data}'")]
    UnregisteredData { data: &'static str },
}

impl RegistryError {
    /// Check if this error is a missing-registration failure
    pub fn is_unregistered(&self) -> bool {
        matches!(
            self,
            RegistryError::UnregisteredKey { .. } | RegistryError::UnregisteredData { .. }
        )
    }
}

impl From<RegistryError> for crate::Error {
    fn from(err: RegistryError) -> Self {
        crate::Error::Registry(err)
    }
}
