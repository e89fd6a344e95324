//! Holder adapters: the boundary between the framework and raw state.
//!
//! A holder (game entity, block, item, anything) owns its raw fields
//! exclusively and knows nothing about attributes. Processors adapt exactly
//! one key ([`ValueProcessor`]) or one whole attribute family
//! ([`DataProcessor`]) onto one family of holders, translating between the
//! framework's typed values and the holder's raw accessor pairs. Nothing in
//! the framework touches a holder field except through a processor.
//!
//! Most processors are a downcast plus a pair of raw accessors; the
//! [`HolderValueProcessor`] and [`HolderDataProcessor`] adapters cover that
//! common shape so a consumer processor is a handful of lines.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::{container::Value, key::KeyInfo, transaction::DataTransactionResult};

mod adapters;

pub use adapters::{HolderDataProcessor, HolderValueProcessor};

/// An opaque object that may carry attributes.
///
/// Blanket-implemented for every `'static` type; processors recover the
/// concrete holder with a downcast through [`DataHolder::as_any`]. The
/// framework never keeps a long-lived reference into a holder; every read
/// copies.
pub trait DataHolder: Any {
    /// The holder as a dynamic value, for downcasting
    fn as_any(&self) -> &dyn Any;

    /// The holder as a mutable dynamic value, for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> DataHolder for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Adapts one key onto one family of holders.
///
/// Reads copy the raw field into container representation; offers write
/// through the raw setter and report a [`DataTransactionResult`]. Attributes
/// intrinsic to a holder cannot be removed, so [`ValueProcessor::remove`]
/// defaults to the uniform no-data failure.
pub trait ValueProcessor: Send + Sync + 'static {
    /// The key this processor services
    fn key(&self) -> &Arc<KeyInfo>;

    /// Capability predicate: can this processor service this holder?
    fn applies_to(&self, holder: &dyn DataHolder) -> bool;

    /// Reads the current value, or `None` when the holder has no value for
    /// the key
    fn read(&self, holder: &dyn DataHolder) -> Option<Value>;

    /// Offers a new value to the holder.
    ///
    /// A successful result carries the applied snapshot and, when the prior
    /// value was readable, the snapshot it replaced.
    fn offer(&self, holder: &mut dyn DataHolder, value: Value) -> DataTransactionResult;

    /// Removes the value from the holder, when the attribute is removable
    fn remove(&self, holder: &mut dyn DataHolder) -> DataTransactionResult {
        let _ = holder;
        DataTransactionResult::fail_no_data()
    }
}

/// Adapts one whole attribute family onto one family of holders.
///
/// The bundle-level counterpart of [`ValueProcessor`]: reads extract a full
/// manipulator, writes apply one atomically from the processor's point of
/// view. Implementations that cannot guarantee atomicity must order raw
/// writes to fail fast before mutating shared derived state (write plain
/// scalars before fields that trigger recomputation, such as a composite
/// tint derived from an effect list).
pub trait DataProcessor: Send + Sync + 'static {
    /// `TypeId` of the manipulator type this processor services
    fn data_type(&self) -> TypeId;

    /// Name of the attribute family, for diagnostics
    fn data_name(&self) -> &'static str;

    /// Capability predicate: can this processor service this holder?
    fn applies_to(&self, holder: &dyn DataHolder) -> bool;

    /// Whether the attribute family is meaningful for this holder at all.
    ///
    /// Distinct from "present but default": a holder without the relevant
    /// behavior reports `false` here and every operation against it resolves
    /// to the no-data outcome.
    fn data_exists(&self, holder: &dyn DataHolder) -> bool;

    /// Extracts the current bundle as a boxed manipulator, or `None` when
    /// the family does not exist on the holder
    fn read(&self, holder: &dyn DataHolder) -> Option<Box<dyn Any>>;

    /// Applies a full bundle (`data` is a `&M` for this processor's
    /// manipulator type)
    fn write(&self, holder: &mut dyn DataHolder, data: &dyn Any) -> DataTransactionResult;

    /// Removes the family from the holder, when removable
    fn remove_from(&self, holder: &mut dyn DataHolder) -> DataTransactionResult {
        let _ = holder;
        DataTransactionResult::fail_no_data()
    }
}
