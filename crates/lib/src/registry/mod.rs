//! Processor registration and ordered-fallback dispatch.
//!
//! The [`DataRegistry`] is the process-wide lookup from key id and
//! manipulator type to the processors able to service them. It has an
//! explicit lifecycle: every processor is registered through a
//! [`DataRegistryBuilder`] during bootstrap, `build()` freezes the registry,
//! and queries only ever see the frozen state through a passed-in handle.
//! There is no ambient global and no lazy registration.
//!
//! Dispatch is a linear, ordered scan: per key (or manipulator type) the
//! candidate processors are tried in registration order and the first whose
//! `applies_to` accepts the holder wins. Registering a more specific
//! processor *before* a more general one is how behavior is overridden for a
//! holder subtype; no existing processor is ever touched to support a new
//! holder kind.

use std::{any::TypeId, collections::HashMap, sync::Arc};

use tracing::{debug, trace};

use crate::{
    Result,
    cache::ImmutableCache,
    key::{AttrType, Key},
    manipulator::{DataError, Manipulator},
    processor::{DataHolder, DataProcessor, ValueProcessor},
    transaction::DataTransactionResult,
    value::AttrValue,
};

mod errors;

pub use errors::RegistryError;

/// Accumulates processor registrations during bootstrap.
///
/// Registration order is preserved per key id and per manipulator type; it
/// is the dispatch order.
#[derive(Default)]
pub struct DataRegistryBuilder {
    value_processors: HashMap<String, Vec<Arc<dyn ValueProcessor>>>,
    data_processors: HashMap<TypeId, Vec<Arc<dyn DataProcessor>>>,
    cache_capacity: Option<usize>,
}

impl DataRegistryBuilder {
    /// Starts an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value processor behind any processors already registered
    /// for the same key
    pub fn register_value_processor(mut self, processor: impl ValueProcessor) -> Self {
        let key_id = processor.key().id().to_string();
        self.value_processors
            .entry(key_id)
            .or_default()
            .push(Arc::new(processor));
        self
    }

    /// Registers a data processor behind any processors already registered
    /// for the same manipulator type
    pub fn register_data_processor(mut self, processor: impl DataProcessor) -> Self {
        let data_type = processor.data_type();
        self.data_processors
            .entry(data_type)
            .or_default()
            .push(Arc::new(processor));
        self
    }

    /// Overrides the snapshot cache's canonicalization bound
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Freezes the registry. No registration is possible afterwards.
    pub fn build(self) -> DataRegistry {
        let keys = self.value_processors.len();
        let families = self.data_processors.len();
        debug!(keys, families, "data registry frozen");
        DataRegistry {
            value_processors: self.value_processors,
            data_processors: self.data_processors,
            cache: match self.cache_capacity {
                Some(capacity) => ImmutableCache::with_capacity(capacity),
                None => ImmutableCache::new(),
            },
        }
    }
}

/// The frozen process-wide processor lookup.
///
/// All queries resolve with the same algorithm: fetch the ordered candidate
/// list for the key or manipulator type (a missing list is a bootstrap bug
/// and fails loudly), scan for the first processor that accepts the holder,
/// and dispatch to it. When no candidate accepts, the operation reports the
/// unsupported outcome (`None` for reads, [`fail_no_data`] for writes),
/// which callers are expected to treat as ordinary data.
///
/// [`fail_no_data`]: DataTransactionResult::fail_no_data
pub struct DataRegistry {
    value_processors: HashMap<String, Vec<Arc<dyn ValueProcessor>>>,
    data_processors: HashMap<TypeId, Vec<Arc<dyn DataProcessor>>>,
    cache: ImmutableCache,
}

impl DataRegistry {
    /// Starts a bootstrap builder
    pub fn builder() -> DataRegistryBuilder {
        DataRegistryBuilder::new()
    }

    /// The registry's snapshot canonicalization cache
    pub fn cache(&self) -> &ImmutableCache {
        &self.cache
    }

    fn resolve_value<T: AttrType>(
        &self,
        holder: &dyn DataHolder,
        key: &Key<T>,
    ) -> Result<Option<&Arc<dyn ValueProcessor>>> {
        let candidates = self.value_processors.get(key.id()).ok_or_else(|| {
            RegistryError::UnregisteredKey {
                key: key.id().to_string(),
            }
        })?;
        for processor in candidates {
            if processor.applies_to(holder) {
                return Ok(Some(processor));
            }
            trace!(key = key.id(), "value processor rejected holder, falling back");
        }
        Ok(None)
    }

    fn resolve_data<M: Manipulator>(
        &self,
        holder: &dyn DataHolder,
    ) -> Result<Option<&Arc<dyn DataProcessor>>> {
        let candidates = self
            .data_processors
            .get(&TypeId::of::<M>())
            .ok_or(RegistryError::UnregisteredData {
                data: M::data_name(),
            })?;
        for processor in candidates {
            if processor.applies_to(holder) {
                return Ok(Some(processor));
            }
            trace!(
                data = M::data_name(),
                "data processor rejected holder, falling back"
            );
        }
        Ok(None)
    }

    /// Reads one attribute from a holder.
    ///
    /// `Ok(None)` when no registered processor accepts the holder or the
    /// holder has no value for the key; `Err` only for bootstrap bugs
    /// (unregistered key, a processor producing a wrong-typed value).
    pub fn get_value<T: AttrType>(
        &self,
        holder: &dyn DataHolder,
        key: &Key<T>,
    ) -> Result<Option<T>> {
        let Some(processor) = self.resolve_value(holder, key)? else {
            return Ok(None);
        };
        match processor.read(holder) {
            Some(raw) => {
                let typed = T::from_value(&raw).ok_or_else(|| DataError::TypeMismatch {
                    key: key.id().to_string(),
                    expected: T::type_name(),
                    actual: raw.type_name(),
                })?;
                Ok(Some(typed))
            }
            None => Ok(None),
        }
    }

    /// Reads one attribute wrapped as a mutable value object.
    ///
    /// The returned [`AttrValue`] is a copy; mutating it does not write back
    /// to the holder until it is offered again.
    pub fn get_attr_value<T: AttrType>(
        &self,
        holder: &dyn DataHolder,
        key: &Key<T>,
    ) -> Result<Option<AttrValue<T>>> {
        Ok(self
            .get_value(holder, key)?
            .map(|current| AttrValue::new(key.clone(), current)))
    }

    /// Offers one attribute value to a holder
    pub fn offer_value<T: AttrType>(
        &self,
        holder: &mut dyn DataHolder,
        key: &Key<T>,
        value: T,
    ) -> Result<DataTransactionResult> {
        let Some(processor) = self.resolve_value(&*holder, key)? else {
            return Ok(DataTransactionResult::fail_no_data());
        };
        let processor = Arc::clone(processor);
        Ok(processor.offer(holder, value.into_value()))
    }

    /// Removes one attribute from a holder, when removable
    pub fn remove_value<T: AttrType>(
        &self,
        holder: &mut dyn DataHolder,
        key: &Key<T>,
    ) -> Result<DataTransactionResult> {
        let Some(processor) = self.resolve_value(&*holder, key)? else {
            return Ok(DataTransactionResult::fail_no_data());
        };
        let processor = Arc::clone(processor);
        Ok(processor.remove(holder))
    }

    /// Extracts a full attribute bundle from a holder.
    ///
    /// `Ok(None)` when no processor accepts the holder or the family does
    /// not exist on it.
    pub fn get_data<M: Manipulator>(&self, holder: &dyn DataHolder) -> Result<Option<M>> {
        let Some(processor) = self.resolve_data::<M>(holder)? else {
            return Ok(None);
        };
        Ok(processor
            .read(holder)
            .and_then(|boxed| boxed.downcast::<M>().ok())
            .map(|boxed| *boxed))
    }

    /// Applies a full attribute bundle to a holder
    pub fn offer_data<M: Manipulator>(
        &self,
        holder: &mut dyn DataHolder,
        data: &M,
    ) -> Result<DataTransactionResult> {
        let Some(processor) = self.resolve_data::<M>(&*holder)? else {
            return Ok(DataTransactionResult::fail_no_data());
        };
        let processor = Arc::clone(processor);
        Ok(processor.write(holder, data))
    }

    /// Removes an attribute family from a holder, when removable
    pub fn remove_data<M: Manipulator>(
        &self,
        holder: &mut dyn DataHolder,
    ) -> Result<DataTransactionResult> {
        let Some(processor) = self.resolve_data::<M>(&*holder)? else {
            return Ok(DataTransactionResult::fail_no_data());
        };
        let processor = Arc::clone(processor);
        Ok(processor.remove_from(holder))
    }

    /// Whether the attribute family is meaningful for this holder
    pub fn supports_data<M: Manipulator>(&self, holder: &dyn DataHolder) -> Result<bool> {
        Ok(self
            .resolve_data::<M>(holder)?
            .is_some_and(|processor| processor.data_exists(holder)))
    }
}
