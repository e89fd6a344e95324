//! Typed attribute identifiers.
//!
//! A [`Key`] names one logical attribute ("duration: int", "radius: float")
//! and carries the attribute's value type at the type level. Keys are created
//! once at process start, usually as `LazyLock` statics, and handed around by
//! cheap clone; everything that needs to treat keys uniformly (descriptors,
//! processors, transaction results) works against the erased [`KeyInfo`].
//!
//! ```
//! use std::sync::LazyLock;
//! use attrium::key::Key;
//!
//! static DURATION: LazyLock<Key<i64>> = LazyLock::new(|| Key::new("duration", 600));
//!
//! assert_eq!(DURATION.id(), "duration");
//! assert_eq!(DURATION.default(), 600);
//! ```

use std::{
    any::TypeId,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::Arc,
};

use crate::container::{Container, Value};

/// Value types attachable to a [`Key`].
///
/// Implementations bridge a concrete Rust type to the container-level
/// [`Value`] representation. The framework ships implementations for the
/// primitive attribute types plus `Vec<T>` (ordered composites) and
/// [`Container`] (structured composites); consumers with richer attribute
/// types serialize them through one of these.
pub trait AttrType: Clone + PartialEq + Send + Sync + 'static {
    /// Name of this value type, used in diagnostics and type mismatch errors
    fn type_name() -> &'static str;

    /// Converts this value into its container representation
    fn into_value(self) -> Value;

    /// Reads a value back out of its container representation.
    ///
    /// Returns `None` when the container value has the wrong shape.
    fn from_value(value: &Value) -> Option<Self>;
}

impl AttrType for bool {
    fn type_name() -> &'static str {
        "bool"
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl AttrType for i64 {
    fn type_name() -> &'static str {
        "int"
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl AttrType for f64 {
    fn type_name() -> &'static str {
        "float"
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl AttrType for String {
    fn type_name() -> &'static str {
        "text"
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl AttrType for Container {
    fn type_name() -> &'static str {
        "container"
    }

    fn into_value(self) -> Value {
        Value::Container(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_container().cloned()
    }
}

impl<T: AttrType> AttrType for Vec<T> {
    fn type_name() -> &'static str {
        "list"
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(AttrType::into_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

/// Erased key descriptor shared by every clone of a [`Key`].
///
/// Carries everything the untyped layers need: the identifier, the value
/// type (as both a name and a `TypeId`), and the default in container form.
#[derive(Debug)]
pub struct KeyInfo {
    id: String,
    value_type: &'static str,
    value_type_id: TypeId,
    default: Value,
}

impl KeyInfo {
    /// The key's globally unique identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the key's declared value type
    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    /// `TypeId` of the key's declared value type
    pub fn value_type_id(&self) -> TypeId {
        self.value_type_id
    }

    /// The key's default value, in container representation
    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl PartialEq for KeyInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KeyInfo {}

impl Hash for KeyInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.value_type)
    }
}

/// An immutable, globally unique, typed identifier for one logical attribute.
///
/// Two keys with the same id are the same key: equality and hashing go by id,
/// and the value type of an id never changes after the key is first built.
/// Clones share the underlying [`KeyInfo`].
pub struct Key<T: AttrType> {
    info: Arc<KeyInfo>,
    _value: PhantomData<fn() -> T>,
}

impl<T: AttrType> Key<T> {
    /// Creates a key with the given id and default value.
    ///
    /// Intended to be called once per id, from a `LazyLock` static or a
    /// bootstrap catalog, before the registry is first queried.
    pub fn new(id: impl Into<String>, default: T) -> Self {
        Self {
            info: Arc::new(KeyInfo {
                id: id.into(),
                value_type: T::type_name(),
                value_type_id: TypeId::of::<T>(),
                default: default.into_value(),
            }),
            _value: PhantomData,
        }
    }

    /// The key's globally unique identifier
    pub fn id(&self) -> &str {
        self.info.id()
    }

    /// The typed default value for this key
    pub fn default(&self) -> T {
        // The default was encoded from a T in `new`, so this cannot fail.
        T::from_value(&self.info.default).unwrap_or_else(|| {
            unreachable!("key {} default has type {}", self.info.id, self.info.value_type)
        })
    }

    /// The erased descriptor backing this key
    pub fn info(&self) -> &Arc<KeyInfo> {
        &self.info
    }
}

impl<T: AttrType> Clone for Key<T> {
    fn clone(&self) -> Self {
        Self {
            info: Arc::clone(&self.info),
            _value: PhantomData,
        }
    }
}

impl<T: AttrType> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.info, &other.info) || self.info == other.info
    }
}

impl<T: AttrType> Eq for Key<T> {}

impl<T: AttrType> Hash for Key<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.hash(state);
    }
}

impl<T: AttrType> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.info.id)
            .field("value_type", &self.info.value_type)
            .finish()
    }
}

impl<T: AttrType> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.info.fmt(f)
    }
}
