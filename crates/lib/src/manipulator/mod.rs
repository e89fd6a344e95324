//! Attribute bundles with generic bulk operations.
//!
//! A manipulator groups several related keys into one cohesive aggregate
//! (all attributes of a lingering field emitter, say) with bulk get/set,
//! copy, container (de)serialization, and mutable↔immutable conversion.
//!
//! Implementing [`Manipulator`] takes a plain struct, `Default`, and one
//! [`Descriptor`] row per attribute; every bulk operation is a provided
//! method driven by that table:
//!
//! ```
//! use std::sync::LazyLock;
//! use attrium::key::Key;
//! use attrium::manipulator::{Descriptor, Manipulator};
//!
//! static DURATION: LazyLock<Key<i64>> = LazyLock::new(|| Key::new("duration", 600));
//! static RADIUS: LazyLock<Key<f64>> = LazyLock::new(|| Key::new("radius", 3.0));
//!
//! #[derive(Clone, PartialEq)]
//! struct EmitterData {
//!     duration: i64,
//!     radius: f64,
//! }
//!
//! impl Default for EmitterData {
//!     fn default() -> Self {
//!         Self { duration: DURATION.default(), radius: RADIUS.default() }
//!     }
//! }
//!
//! static DESCRIPTOR: LazyLock<Descriptor<EmitterData>> = LazyLock::new(|| {
//!     Descriptor::builder()
//!         .field(&DURATION, |d: &EmitterData| d.duration, |d, v| d.duration = v)
//!         .field(&RADIUS, |d: &EmitterData| d.radius, |d, v| d.radius = v)
//!         .build()
//! });
//!
//! impl Manipulator for EmitterData {
//!     fn data_name() -> &'static str {
//!         "emitter"
//!     }
//!
//!     fn descriptor() -> &'static Descriptor<Self> {
//!         &DESCRIPTOR
//!     }
//! }
//!
//! let mut data = EmitterData::default();
//! data.set(&DURATION, 200).unwrap();
//! let doc = data.to_container();
//! assert_eq!(doc.get_as::<i64>("duration"), Some(200));
//! assert_eq!(doc.get_as::<f64>("radius"), Some(3.0));
//! ```

use std::sync::Arc;

use tracing::warn;

use crate::{
    Result,
    container::Container,
    key::{AttrType, Key, KeyInfo},
    transaction::DataTransactionResult,
    value::ValueSnapshot,
};

mod descriptor;
mod errors;
mod immutable;

pub use descriptor::{Descriptor, DescriptorBuilder, Row};
pub use errors::DataError;
pub use immutable::ImmutableManipulator;

/// A bundle of related attributes with table-driven bulk operations.
///
/// `Clone` doubles as the copy operation and must be deep enough that a copy
/// never shares mutable composite state (owned `Vec`s and `Container`s
/// already are). `Default` is the all-defaults bundle used as the `fill`
/// starting point.
pub trait Manipulator: Clone + Default + PartialEq + Send + Sync + 'static {
    /// Short name of this attribute family, used in errors and diagnostics
    fn data_name() -> &'static str;

    /// The per-type registration table driving all bulk operations
    fn descriptor() -> &'static Descriptor<Self>;

    /// Returns the current value for a declared key, or `None` when this
    /// manipulator does not declare the key. An undeclared key is not an
    /// error.
    fn get<T: AttrType>(&self, key: &Key<T>) -> Option<T> {
        let row = Self::descriptor().row(key.id())?;
        T::from_value(&row.read(self))
    }

    /// Sets a declared key to a new value.
    ///
    /// Returns `Ok(false)` when the key is not declared. A value whose shape
    /// disagrees with the row's declared type fails with
    /// [`DataError::TypeMismatch`]; the typed signature makes that
    /// unreachable unless two keys share an id with different types, which
    /// the key invariants forbid.
    fn set<T: AttrType>(&mut self, key: &Key<T>, value: T) -> Result<bool> {
        self.set_raw(key.info(), &value.into_value())
    }

    /// Sets a declared key from a container-level value, type-checked.
    ///
    /// Returns `Ok(false)` when the key is not declared and
    /// `Err(DataError::TypeMismatch)` when the value has the wrong shape.
    fn set_raw(&mut self, key: &KeyInfo, value: &crate::container::Value) -> Result<bool> {
        match Self::descriptor().row(key.id()) {
            Some(row) => {
                row.apply(self, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Static capability query: does this manipulator type declare the key?
    fn supports<T: AttrType>(key: &Key<T>) -> bool {
        Self::descriptor().declares(key.id())
    }

    /// The declared keys, in declaration order
    fn attribute_keys() -> Vec<Arc<KeyInfo>> {
        Self::descriptor().keys().cloned().collect()
    }

    /// Erased value objects for every declared key, in declaration order
    fn values(&self) -> Vec<ValueSnapshot> {
        Self::descriptor()
            .rows()
            .iter()
            .map(|row| row.snapshot(self))
            .collect()
    }

    /// Serializes every declared key into a container
    fn to_container(&self) -> Container {
        let mut container = Container::new();
        for row in Self::descriptor().rows() {
            container.set(row.key().id().to_string(), row.read(self));
        }
        container
    }

    /// Overwrites this manipulator from a container, key by key.
    ///
    /// For every declared key present in the container the value is
    /// overwritten; keys absent from the container keep their prior value.
    /// A malformed entry is skipped (the prior value stays, the entry is
    /// logged and reported in the rejected set) and the fill continues.
    /// Per-key results merge left-to-right in declaration order.
    fn fill_from(&mut self, container: &Container) -> DataTransactionResult {
        let mut merged = DataTransactionResult::successful();
        for row in Self::descriptor().rows() {
            let key = row.key();
            let Some(value) = container.get(key.id()) else {
                continue;
            };
            let prior = row.snapshot(self);
            let outcome = match row.apply(self, value) {
                Ok(()) => DataTransactionResult::success_replace(
                    ValueSnapshot::new(key.clone(), value.clone()),
                    prior,
                ),
                Err(err) => {
                    warn!(
                        key = key.id(),
                        data = Self::data_name(),
                        %err,
                        "skipping malformed container entry"
                    );
                    DataTransactionResult::fail_result(ValueSnapshot::new(
                        key.clone(),
                        value.clone(),
                    ))
                }
            };
            merged = merged.merge(outcome);
        }
        merged
    }

    /// Builds a manipulator from a container, starting at defaults
    fn fill(container: &Container) -> (Self, DataTransactionResult) {
        let mut data = Self::default();
        let result = data.fill_from(container);
        (data, result)
    }

    /// Structural equality over the declared keys, driven by the table.
    ///
    /// Unlike a derived `PartialEq` this ignores fields that are not
    /// registered as attributes.
    fn content_equals(&self, other: &Self) -> bool {
        Self::descriptor()
            .rows()
            .iter()
            .all(|row| row.read(self) == row.read(other))
    }

    /// Takes an immutable snapshot, canonicalized through `cache`.
    ///
    /// Two snapshots of structurally equal manipulators share one
    /// allocation ([`ImmutableManipulator::ptr_eq`]).
    fn as_immutable(&self, cache: &crate::cache::ImmutableCache) -> ImmutableManipulator<Self> {
        ImmutableManipulator::cached_of(cache, self)
    }
}
