//! Typed processor adapters for the common single-family case.

use std::{
    any::{Any, TypeId},
    sync::Arc,
};

use crate::{
    container::Value,
    key::{AttrType, Key, KeyInfo},
    manipulator::Manipulator,
    transaction::{DataTransactionResult, ResultType},
    value::ValueSnapshot,
};

use super::{DataHolder, DataProcessor, ValueProcessor};

type RawGetter<H, T> = Box<dyn Fn(&H) -> Option<T> + Send + Sync>;
type RawSetter<H, T> = Box<dyn Fn(&mut H, T) -> bool + Send + Sync>;

/// A [`ValueProcessor`] for one key on one concrete holder type.
///
/// Built from a key and the holder's raw accessor pair. The getter returns
/// `None` when the holder currently has no value for the key; the setter
/// returns `false` when it rejects the value.
pub struct HolderValueProcessor<H, T: AttrType> {
    key: Key<T>,
    get: RawGetter<H, T>,
    set: RawSetter<H, T>,
}

impl<H: Any + Send + Sync, T: AttrType> HolderValueProcessor<H, T> {
    /// Adapts a raw accessor pair into a value processor for `key`
    pub fn new<G, S>(key: Key<T>, get: G, set: S) -> Self
    where
        G: Fn(&H) -> Option<T> + Send + Sync + 'static,
        S: Fn(&mut H, T) -> bool + Send + Sync + 'static,
    {
        Self {
            key,
            get: Box::new(get),
            set: Box::new(set),
        }
    }

    fn holder<'a>(&self, holder: &'a dyn DataHolder) -> Option<&'a H> {
        holder.as_any().downcast_ref::<H>()
    }
}

impl<H: Any + Send + Sync, T: AttrType> ValueProcessor for HolderValueProcessor<H, T> {
    fn key(&self) -> &Arc<KeyInfo> {
        self.key.info()
    }

    fn applies_to(&self, holder: &dyn DataHolder) -> bool {
        self.holder(holder).is_some()
    }

    fn read(&self, holder: &dyn DataHolder) -> Option<Value> {
        let raw = self.holder(holder)?;
        (self.get)(raw).map(AttrType::into_value)
    }

    fn offer(&self, holder: &mut dyn DataHolder, value: Value) -> DataTransactionResult {
        let snapshot = ValueSnapshot::new(self.key.info().clone(), value.clone());
        let Some(raw) = holder.as_any_mut().downcast_mut::<H>() else {
            return DataTransactionResult::fail_no_data();
        };
        let Some(typed) = T::from_value(&value) else {
            // Wrong shape for the key's declared type; nothing was written.
            return DataTransactionResult::error_result(snapshot);
        };
        let prior = (self.get)(raw);
        if (self.set)(raw, typed) {
            match prior {
                Some(old) => DataTransactionResult::success_replace(
                    snapshot,
                    ValueSnapshot::new(self.key.info().clone(), old.into_value()),
                ),
                None => DataTransactionResult::success_result(snapshot),
            }
        } else {
            DataTransactionResult::fail_result(snapshot)
        }
    }
}

type ExistsFn<H> = Box<dyn Fn(&H) -> bool + Send + Sync>;
type ExtractFn<H, M> = Box<dyn Fn(&H) -> M + Send + Sync>;
type ApplyFn<H, M> = Box<dyn Fn(&mut H, &M) -> bool + Send + Sync>;

/// A [`DataProcessor`] for one manipulator type on one concrete holder type.
///
/// `extract` copies the holder's raw fields into a fresh manipulator;
/// `apply` writes a full bundle back through the raw setters and must order
/// its writes so a rejection happens before any shared derived state is
/// recomputed. `exists` answers whether the family is meaningful for this
/// holder at all.
pub struct HolderDataProcessor<H, M: Manipulator> {
    exists: ExistsFn<H>,
    extract: ExtractFn<H, M>,
    apply: ApplyFn<H, M>,
}

impl<H: Any + Send + Sync, M: Manipulator> HolderDataProcessor<H, M> {
    /// Adapts a holder's raw bundle accessors into a data processor
    pub fn new<E, X, A>(exists: E, extract: X, apply: A) -> Self
    where
        E: Fn(&H) -> bool + Send + Sync + 'static,
        X: Fn(&H) -> M + Send + Sync + 'static,
        A: Fn(&mut H, &M) -> bool + Send + Sync + 'static,
    {
        Self {
            exists: Box::new(exists),
            extract: Box::new(extract),
            apply: Box::new(apply),
        }
    }

    /// A processor for a family intrinsic to the holder type (always exists)
    pub fn intrinsic<X, A>(extract: X, apply: A) -> Self
    where
        X: Fn(&H) -> M + Send + Sync + 'static,
        A: Fn(&mut H, &M) -> bool + Send + Sync + 'static,
    {
        Self::new(|_| true, extract, apply)
    }

    fn holder<'a>(&self, holder: &'a dyn DataHolder) -> Option<&'a H> {
        holder.as_any().downcast_ref::<H>()
    }
}

impl<H: Any + Send + Sync, M: Manipulator> DataProcessor for HolderDataProcessor<H, M> {
    fn data_type(&self) -> TypeId {
        TypeId::of::<M>()
    }

    fn data_name(&self) -> &'static str {
        M::data_name()
    }

    fn applies_to(&self, holder: &dyn DataHolder) -> bool {
        self.holder(holder).is_some()
    }

    fn data_exists(&self, holder: &dyn DataHolder) -> bool {
        self.holder(holder).is_some_and(|raw| (self.exists)(raw))
    }

    fn read(&self, holder: &dyn DataHolder) -> Option<Box<dyn Any>> {
        let raw = self.holder(holder)?;
        if !(self.exists)(raw) {
            return None;
        }
        Some(Box::new((self.extract)(raw)))
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &dyn Any) -> DataTransactionResult {
        let Some(data) = data.downcast_ref::<M>() else {
            return DataTransactionResult::builder()
                .result(ResultType::Error)
                .build();
        };
        let Some(raw) = holder.as_any_mut().downcast_mut::<H>() else {
            return DataTransactionResult::fail_no_data();
        };
        if !(self.exists)(raw) {
            return DataTransactionResult::fail_no_data();
        }

        // Capture the prior bundle first so the replaced set is complete.
        let prior = (self.extract)(raw);
        if (self.apply)(raw, data) {
            let mut builder = DataTransactionResult::builder().result(ResultType::Success);
            for snapshot in data.values() {
                builder = builder.success(snapshot);
            }
            for snapshot in prior.values() {
                builder = builder.replace(snapshot);
            }
            builder.build()
        } else {
            let mut builder = DataTransactionResult::builder().result(ResultType::Failure);
            for snapshot in data.values() {
                builder = builder.reject(snapshot);
            }
            builder.build()
        }
    }
}
