//! Generic nested key→value documents.
//!
//! A [`Container`] is the serialization interchange format of the framework:
//! manipulators write one entry per declared key into a container
//! ([`crate::manipulator::Manipulator::to_container`]) and read them back out
//! (`fill_from`). The framework itself only relies on `contains`, `get` and
//! `set`; the rest of the surface exists for consumers that want to inspect,
//! build, or persist documents directly.
//!
//! # Usage
//!
//! ```
//! use attrium::container::{Container, Value};
//!
//! let mut doc = Container::new();
//! doc.set("duration", 600);
//! doc.set("radius", 3.0);
//!
//! assert!(doc.contains("duration"));
//! assert_eq!(doc.get_as::<i64>("duration"), Some(600));
//! ```

use std::{collections::BTreeMap, fmt};

mod errors;
pub mod value;

pub use errors::ContainerError;
pub use value::Value;

/// A generic nested key→value document.
///
/// Keys are strings; values are [`Value`]s, which may themselves be lists or
/// nested containers. Entries iterate in key order, so two containers with
/// equal content compare, hash, and serialize identically. That determinism
/// is what lets a container act as the canonicalization key for immutable
/// snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Container {
    entries: BTreeMap<String, Value>,
}

impl Container {
    /// Creates a new empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the container has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the container has an entry for the given key
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    /// Gets a value by key
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.entries.get(key.as_ref())
    }

    /// Gets a value by key, converted to the requested type.
    ///
    /// Returns `None` both when the key is absent and when the value has a
    /// different shape; use [`Container::get`] plus `TryFrom` to tell the
    /// two apart.
    pub fn get_as<'a, T>(&'a self, key: impl AsRef<str>) -> Option<T>
    where
        T: TryFrom<&'a Value>,
    {
        self.get(key).and_then(|v| T::try_from(v).ok())
    }

    /// Sets a value, returning the previous value for the key if any
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes an entry, returning its value if it was present
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Value> {
        self.entries.remove(key.as_ref())
    }

    /// Iterates over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over keys in order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Serializes this container to a JSON string
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a container from a JSON string
    pub fn from_json(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            ContainerError::MalformedDocument {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Value)> for Container {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
