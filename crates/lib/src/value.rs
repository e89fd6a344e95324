//! Single attribute values, mutable and immutable.
//!
//! An [`AttrValue`] is a transient `(key, default, current)` triple built on
//! demand by a processor or a manipulator; mutating it never writes back to a
//! holder until the value is explicitly offered through a processor. The
//! immutable variant [`ImmutableAttrValue`] exposes no setter: `with` returns
//! a new instance, and snapshots constructed through
//! [`ImmutableAttrValue::cached_of`] are canonicalized so structurally equal
//! snapshots share one allocation.
//!
//! Equality for both variants is `(key, current)`; the default is metadata
//! and deliberately excluded.

use std::{fmt, sync::Arc};

use crate::{
    cache::ImmutableCache,
    container::Value,
    key::{AttrType, Key, KeyInfo},
};

/// A mutable single-attribute value.
#[derive(Debug, Clone)]
pub struct AttrValue<T: AttrType> {
    key: Key<T>,
    default: T,
    current: T,
}

impl<T: AttrType> AttrValue<T> {
    /// Creates a value for `key` holding `current`, with the key's own default
    pub fn new(key: Key<T>, current: T) -> Self {
        let default = key.default();
        Self {
            key,
            default,
            current,
        }
    }

    /// Creates a value with an explicit default
    pub fn with_default(key: Key<T>, default: T, current: T) -> Self {
        Self {
            key,
            default,
            current,
        }
    }

    /// The key this value belongs to
    pub fn key(&self) -> &Key<T> {
        &self.key
    }

    /// Returns the current value
    pub fn get(&self) -> &T {
        &self.current
    }

    /// Returns the default value
    pub fn default(&self) -> &T {
        &self.default
    }

    /// Replaces the current value in place.
    ///
    /// No domain validation happens here; callers validate upstream.
    pub fn set(&mut self, value: T) -> &mut Self {
        self.current = value;
        self
    }

    /// Consumes this value, returning the current value
    pub fn into_inner(self) -> T {
        self.current
    }

    /// Takes an immutable snapshot, canonicalized through `cache`
    pub fn as_immutable(&self, cache: &ImmutableCache) -> Arc<ImmutableAttrValue<T>> {
        ImmutableAttrValue::cached_of(
            cache,
            self.key.clone(),
            self.default.clone(),
            self.current.clone(),
        )
    }

    /// Erases this value into a `(key, value)` snapshot for transaction results
    pub fn snapshot(&self) -> ValueSnapshot {
        ValueSnapshot::new(self.key.info().clone(), self.current.clone().into_value())
    }
}

impl<T: AttrType> PartialEq for AttrValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.current == other.current
    }
}

impl<T: AttrType> Eq for AttrValue<T> {}

/// An immutable single-attribute value.
///
/// Structurally identical to [`AttrValue`] but with no setter; `with`
/// produces a new instance instead of mutating in place.
#[derive(Debug, Clone)]
pub struct ImmutableAttrValue<T: AttrType> {
    key: Key<T>,
    default: T,
    current: T,
}

impl<T: AttrType> ImmutableAttrValue<T> {
    /// Creates an uncached immutable value
    pub fn new(key: Key<T>, current: T) -> Self {
        let default = key.default();
        Self {
            key,
            default,
            current,
        }
    }

    /// Returns the canonical cached instance for `(key, default, current)`.
    ///
    /// Two calls with equal arguments return the same `Arc`; the instances
    /// are interchangeable by pointer identity.
    pub fn cached_of(
        cache: &ImmutableCache,
        key: Key<T>,
        default: T,
        current: T,
    ) -> Arc<Self> {
        let args = Value::List(vec![
            Value::Text(key.id().to_string()),
            default.clone().into_value(),
            current.clone().into_value(),
        ]);
        cache.get_or_create(args, || Self {
            key,
            default,
            current,
        })
    }

    /// The key this value belongs to
    pub fn key(&self) -> &Key<T> {
        &self.key
    }

    /// Returns the current value
    pub fn get(&self) -> &T {
        &self.current
    }

    /// Returns the default value
    pub fn default(&self) -> &T {
        &self.default
    }

    /// Returns a new immutable value holding `value`; `self` is untouched
    pub fn with(&self, value: T) -> Self {
        Self {
            key: self.key.clone(),
            default: self.default.clone(),
            current: value,
        }
    }

    /// Converts back to a mutable value (an independent copy)
    pub fn as_mutable(&self) -> AttrValue<T> {
        AttrValue::with_default(self.key.clone(), self.default.clone(), self.current.clone())
    }

    /// Erases this value into a `(key, value)` snapshot for transaction results
    pub fn snapshot(&self) -> ValueSnapshot {
        ValueSnapshot::new(self.key.info().clone(), self.current.clone().into_value())
    }
}

impl<T: AttrType> PartialEq for ImmutableAttrValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.current == other.current
    }
}

impl<T: AttrType> Eq for ImmutableAttrValue<T> {}

/// An erased immutable `(key, value)` pair.
///
/// Transaction results carry these instead of the typed value objects so a
/// single result type can report outcomes across keys of different value
/// types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSnapshot {
    key: Arc<KeyInfo>,
    value: Value,
}

impl ValueSnapshot {
    /// Creates a snapshot from an erased key and a container-level value
    pub fn new(key: Arc<KeyInfo>, value: Value) -> Self {
        Self { key, value }
    }

    /// Creates a snapshot from a typed key and value
    pub fn of<T: AttrType>(key: &Key<T>, value: T) -> Self {
        Self::new(key.info().clone(), value.into_value())
    }

    /// The key this snapshot belongs to
    pub fn key(&self) -> &KeyInfo {
        &self.key
    }

    /// The captured value, in container representation
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The captured value, decoded to its attribute type
    pub fn value_as<T: AttrType>(&self) -> Option<T> {
        T::from_value(&self.value)
    }
}

impl fmt::Display for ValueSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key.id(), self.value)
    }
}
