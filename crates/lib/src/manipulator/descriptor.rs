//! Static registration tables for manipulator types.
//!
//! Every manipulator type declares its attributes once, in a
//! [`Descriptor`] built by [`Descriptor::builder`] and stored in a
//! `LazyLock`. Each declared key gets one [`Row`] holding three closures: a
//! getter, a type-checked setter, and a value-object factory. All generic
//! bulk operations (`to_container`, `fill_from`, `values`,
//! `content_equals`) walk this table, so adding an attribute to a
//! manipulator means adding one `field` call, never touching the bulk
//! logic.
//!
//! The table is per *type*, shared by every instance, and immutable once
//! built.

use std::{collections::HashMap, sync::Arc};

use crate::{
    container::Value,
    key::{AttrType, Key, KeyInfo},
    value::ValueSnapshot,
};

use super::DataError;

type Getter<M> = Box<dyn Fn(&M) -> Value + Send + Sync>;
type Setter<M> = Box<dyn Fn(&mut M, &Value) -> Result<(), DataError> + Send + Sync>;
type ValueFactory<M> = Box<dyn Fn(&M) -> ValueSnapshot + Send + Sync>;

/// One declared attribute of a manipulator type: the erased key plus the
/// getter, setter, and value-object factory closures that service it.
pub struct Row<M> {
    key: Arc<KeyInfo>,
    get: Getter<M>,
    set: Setter<M>,
    make_value: ValueFactory<M>,
}

impl<M> Row<M> {
    /// The key this row services
    pub fn key(&self) -> &Arc<KeyInfo> {
        &self.key
    }

    /// Reads the attribute's current value in container representation
    pub fn read(&self, data: &M) -> Value {
        (self.get)(data)
    }

    /// Writes a container-level value into the backing field.
    ///
    /// Fails with [`DataError::TypeMismatch`] when the value has the wrong
    /// shape for the row's declared type; the field is untouched in that
    /// case.
    pub fn apply(&self, data: &mut M, value: &Value) -> Result<(), DataError> {
        (self.set)(data, value)
    }

    /// Builds the erased value object for the attribute's current value
    pub fn snapshot(&self, data: &M) -> ValueSnapshot {
        (self.make_value)(data)
    }
}

impl<M> std::fmt::Debug for Row<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row").field("key", &self.key.id()).finish()
    }
}

/// The registration table of one manipulator type.
///
/// Rows keep declaration order; lookups by key id go through an index.
#[derive(Debug)]
pub struct Descriptor<M> {
    rows: Vec<Row<M>>,
    index: HashMap<String, usize>,
}

impl<M: 'static> Descriptor<M> {
    /// Starts an empty table
    pub fn builder() -> DescriptorBuilder<M> {
        DescriptorBuilder {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Looks up the row servicing a key id
    pub fn row(&self, key_id: &str) -> Option<&Row<M>> {
        self.index.get(key_id).map(|&i| &self.rows[i])
    }

    /// Returns true if the table declares the key id
    pub fn declares(&self, key_id: &str) -> bool {
        self.index.contains_key(key_id)
    }

    /// Rows in declaration order
    pub fn rows(&self) -> &[Row<M>] {
        &self.rows
    }

    /// Number of declared attributes
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no attributes are declared
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Declared keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &Arc<KeyInfo>> {
        self.rows.iter().map(Row::key)
    }
}

/// Builds a [`Descriptor`] row by row.
pub struct DescriptorBuilder<M> {
    rows: Vec<Row<M>>,
    index: HashMap<String, usize>,
}

impl<M: 'static> DescriptorBuilder<M> {
    /// Registers one attribute: its key and the raw field accessors.
    ///
    /// The erased getter, type-checked setter, and value factory are derived
    /// from the typed accessor pair. Registering the same key id twice
    /// replaces the earlier row.
    pub fn field<T, G, S>(mut self, key: &Key<T>, get: G, set: S) -> Self
    where
        T: AttrType,
        G: Fn(&M) -> T + Send + Sync + 'static,
        S: Fn(&mut M, T) + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        let info = key.info().clone();

        let getter = {
            let get = Arc::clone(&get);
            Box::new(move |data: &M| get(data).into_value())
        };
        let setter = {
            let info = info.clone();
            Box::new(move |data: &mut M, value: &Value| match T::from_value(value) {
                Some(typed) => {
                    set(data, typed);
                    Ok(())
                }
                None => Err(DataError::TypeMismatch {
                    key: info.id().to_string(),
                    expected: T::type_name(),
                    actual: value.type_name(),
                }),
            })
        };
        let make_value = {
            let key = key.clone();
            Box::new(move |data: &M| ValueSnapshot::of(&key, get(data)))
        };

        match self.index.get(info.id()) {
            Some(&i) => {
                self.rows[i] = Row {
                    key: info,
                    get: getter,
                    set: setter,
                    make_value,
                };
            }
            None => {
                self.index.insert(info.id().to_string(), self.rows.len());
                self.rows.push(Row {
                    key: info,
                    get: getter,
                    set: setter,
                    make_value,
                });
            }
        }
        self
    }

    /// Finishes the table
    pub fn build(self) -> Descriptor<M> {
        Descriptor {
            rows: self.rows,
            index: self.index,
        }
    }
}
