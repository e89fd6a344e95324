//! Immutable manipulator snapshots.

use std::sync::Arc;

use crate::{
    Result,
    cache::ImmutableCache,
    container::{Container, Value},
    key::{AttrType, Key, KeyInfo},
    value::ValueSnapshot,
};

use super::{DataError, Manipulator};

/// An immutable snapshot of a manipulator.
///
/// Shares the key set and field layout of its mutable counterpart but
/// exposes only reads; [`ImmutableManipulator::with`] returns a new snapshot
/// and [`ImmutableManipulator::as_mutable`] returns an independent deep
/// copy. Snapshots taken through [`Manipulator::as_immutable`] are
/// canonicalized: structurally equal snapshots share one allocation and
/// compare interchangeable by [`ImmutableManipulator::ptr_eq`].
#[derive(Debug)]
pub struct ImmutableManipulator<M: Manipulator> {
    inner: Arc<M>,
}

impl<M: Manipulator> ImmutableManipulator<M> {
    /// Wraps a manipulator without canonicalizing
    pub fn new(data: M) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Returns the canonical snapshot of `data`, keyed by its container form
    pub(super) fn cached_of(cache: &ImmutableCache, data: &M) -> Self {
        let args = Value::Container(data.to_container());
        let inner = cache.get_or_create(args, || data.clone());
        Self { inner }
    }

    /// Returns the current value for a declared key, or `None` when the key
    /// is not declared
    pub fn get<T: AttrType>(&self, key: &Key<T>) -> Option<T> {
        self.inner.get(key)
    }

    /// Static capability query, same as the mutable side
    pub fn supports<T: AttrType>(key: &Key<T>) -> bool {
        M::supports(key)
    }

    /// The declared keys, in declaration order
    pub fn attribute_keys(&self) -> Vec<Arc<KeyInfo>> {
        M::attribute_keys()
    }

    /// Erased value objects for every declared key
    pub fn values(&self) -> Vec<ValueSnapshot> {
        self.inner.values()
    }

    /// Serializes every declared key into a container
    pub fn to_container(&self) -> Container {
        self.inner.to_container()
    }

    /// Returns a new snapshot with one key changed; `self` is untouched.
    ///
    /// Fails loudly when the key is not declared: silently returning an
    /// unchanged snapshot would hide a programming error.
    pub fn with<T: AttrType>(&self, key: &Key<T>, value: T) -> Result<Self> {
        let mut copy = self.as_mutable();
        if !copy.set(key, value)? {
            return Err(DataError::KeyNotDeclared {
                key: key.id().to_string(),
                data: M::data_name(),
            }
            .into());
        }
        Ok(Self::new(copy))
    }

    /// Returns an independent mutable copy.
    ///
    /// The copy shares nothing mutable with this snapshot: scalar fields are
    /// copied and composite fields (ordered lists, nested containers) are
    /// owned clones.
    pub fn as_mutable(&self) -> M {
        (*self.inner).clone()
    }

    /// Pointer identity: true when both snapshots are the same canonical
    /// instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<M: Manipulator> Clone for ImmutableManipulator<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Manipulator> PartialEq for ImmutableManipulator<M> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl<M: Manipulator + Eq> Eq for ImmutableManipulator<M> {}
