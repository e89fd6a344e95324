//!
//! Attrium: a typed attribute overlay framework.
//! This library attaches structured, snapshot-able, transactionally mutable
//! named attributes onto arbitrary opaque host objects ("data holders")
//! without the holder knowing about any specific attribute.
//!
//! ## Core Concepts
//!
//! * **Keys (`key::Key`)**: immutable, globally unique typed identifiers for
//!   one logical attribute ("duration: int"), created once at process start.
//! * **Values (`value::AttrValue` / `value::ImmutableAttrValue`)**: transient
//!   `(key, default, current)` triples; the immutable variant is
//!   canonicalized so structurally equal snapshots share one allocation.
//! * **Manipulators (`manipulator::Manipulator`)**: bundles of related keys
//!   with table-driven bulk get/set, copy, container (de)serialization, and
//!   mutable↔immutable conversion.
//! * **Processors (`processor::ValueProcessor` / `processor::DataProcessor`)**:
//!   adapters translating between the framework's typed values and one holder
//!   family's raw accessors. Nothing touches a holder except through one.
//! * **Registry (`registry::DataRegistry`)**: the frozen process-wide lookup
//!   from key or manipulator type to candidate processors, dispatched by
//!   ordered first-applicable-wins fallback.
//! * **Transaction results (`transaction::DataTransactionResult`)**: the
//!   uniform outcome record of every mutating operation: applied, replaced,
//!   and rejected values plus an overall result type.
//! * **Containers (`container::Container`)**: generic nested key→value
//!   documents used as the serialization interchange format.

pub mod cache;
pub mod container;
pub mod key;
pub mod manipulator;
pub mod processor;
pub mod registry;
pub mod transaction;
pub mod value;

/// Re-exports of the types most consumers touch.
pub use cache::ImmutableCache;
pub use container::Container;
pub use key::Key;
pub use manipulator::Manipulator;
pub use registry::DataRegistry;
pub use transaction::DataTransactionResult;

/// Result type used throughout the Attrium library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Attrium library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured container errors from the container module
    #[error(transparent)]
    Container(container::ContainerError),

    /// Structured typed-data errors from the manipulator module
    #[error(transparent)]
    Data(manipulator::DataError),

    /// Structured dispatch errors from the registry module
    #[error(transparent)]
    Registry(registry::RegistryError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Container(_) => "container",
            Error::Data(_) => "data",
            Error::Registry(_) => "registry",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is a runtime type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Container(container_err) => container_err.is_type_error(),
            Error::Data(data_err) => data_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error marks a key or manipulator type that was never
    /// registered during bootstrap.
    pub fn is_unregistered(&self) -> bool {
        match self {
            Error::Registry(registry_err) => registry_err.is_unregistered(),
            _ => false,
        }
    }

    /// Check if this error marks a key used against a manipulator that does
    /// not declare it.
    pub fn is_not_declared(&self) -> bool {
        match self {
            Error::Data(data_err) => data_err.is_not_declared(),
            _ => false,
        }
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Container(container_err) => container_err.is_malformed(),
            _ => false,
        }
    }
}
