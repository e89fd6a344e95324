//! Canonicalization cache for immutable snapshots.
//!
//! Immutable values and manipulator snapshots are created constantly (every
//! `as_immutable` call, every successful transaction result). The
//! [`ImmutableCache`] canonicalizes them by `(type, constructor arguments)`
//! so structurally equal snapshots share one allocation, bounding memory
//! growth from repeated snapshotting.
//!
//! The cache is the one process-wide shared-mutable structure in the
//! framework. Lookups take a read lock; a miss builds the instance outside
//! any lock and inserts under the write lock. When two threads race to build
//! the same entry, exactly one insertion wins and the loser's instance is
//! dropped, which is harmless: cached types have no side effects beyond
//! their own fields.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::container::Value;

const DEFAULT_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    type_id: TypeId,
    args: Value,
}

/// Canonicalizing store for immutable instances, keyed by
/// `(type, constructor arguments)` with value equality on the arguments.
#[derive(Debug)]
pub struct ImmutableCache {
    entries: RwLock<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>,
    capacity: usize,
}

impl ImmutableCache {
    /// Creates a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a cache that stops canonicalizing past `capacity` entries.
    ///
    /// Past the bound, `get_or_create` still returns correct instances; they
    /// are just no longer shared.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Returns the canonical instance of `T` for `args`, building it on miss.
    ///
    /// Two calls with equal `args` (value equality, not identity) return the
    /// same `Arc`. `build` runs without any lock held; if a concurrent call
    /// wins the insertion race its instance becomes canonical and this call's
    /// freshly built one is dropped.
    pub fn get_or_create<T, F>(&self, args: Value, build: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let key = CacheKey {
            type_id: TypeId::of::<T>(),
            args,
        };

        if let Some(hit) = self.lookup(&key) {
            return hit;
        }

        let fresh = Arc::new(build());

        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            // A panic while holding the lock only loses cached snapshots;
            // canonicalization degrades to uncached instances.
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(existing) = entries.get(&key)
            && let Ok(canonical) = Arc::clone(existing).downcast::<T>()
        {
            return canonical;
        }
        if entries.len() < self.capacity {
            entries.insert(key, fresh.clone() as Arc<dyn Any + Send + Sync>);
        }
        fresh
    }

    /// Returns the cached instance for `(T, args)` without creating one
    pub fn lookup_args<T>(&self, args: &Value) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.lookup(&CacheKey {
            type_id: TypeId::of::<T>(),
            args: args.clone(),
        })
    }

    fn lookup<T>(&self, key: &CacheKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .get(key)
            .and_then(|arc| Arc::clone(arc).downcast::<T>().ok())
    }

    /// Number of canonical entries currently held
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns true if nothing has been canonicalized yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The canonicalization bound
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ImmutableCache {
    fn default() -> Self {
        Self::new()
    }
}
