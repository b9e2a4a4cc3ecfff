//! Documents and the patches that write them.
//!
//! A [`Patch`] is an ordered list of field operations. Besides plain
//! values it carries two kinds of sentinel the store resolves while it
//! holds the write: the server time, and set-style array union/removal.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use ideaboard_core::types::DocId;

use crate::error::{StoreReadError, StoreWriteError};

/// Collection names.
pub mod collections {
    pub const IDEAS: &str = "ideas";
    pub const CATEGORIES: &str = "categories";
    pub const BUGS: &str = "bugs";
}

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    /// Starts at 1 and increments on every committed write.
    pub version: u64,
    pub data: Fields,
}

impl Document {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Length of an array field; absent or non-array fields count as empty.
    pub fn array_len(&self, name: &str) -> usize {
        self.field(name)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Decode into a record type, exposing the document id as `id`.
    pub fn decode<T: DeserializeOwned>(&self, collection: &str) -> Result<T, StoreReadError> {
        let mut map = self.data.clone();
        map.insert("id".into(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(map)).map_err(|e| StoreReadError::Decode {
            collection: collection.to_string(),
            id: self.id.clone(),
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// One field operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Overwrite the field.
    Set(Value),
    /// Overwrite the field with the store's current time.
    ServerTimestamp,
    /// Append each value not already present in the array.
    ArrayUnion(Vec<Value>),
    /// Drop every occurrence of each value from the array.
    ArrayRemove(Vec<Value>),
}

/// Ordered field operations applied as one write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<(String, FieldValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((field.into(), FieldValue::Set(value.into())));
        self
    }

    /// Set a field to any serializable value.
    pub fn set_serialized<T: Serialize + ?Sized>(
        self,
        field: impl Into<String>,
        value: &T,
    ) -> Result<Self, StoreWriteError> {
        let value = serde_json::to_value(value).map_err(|e| StoreWriteError::Encode(e.to_string()))?;
        Ok(self.set(field, value))
    }

    pub fn server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.ops.push((field.into(), FieldValue::ServerTimestamp));
        self
    }

    pub fn array_union(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.ops.push((field.into(), FieldValue::ArrayUnion(values)));
        self
    }

    pub fn array_remove(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.ops.push((field.into(), FieldValue::ArrayRemove(values)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.ops.iter().map(|(f, v)| (f.as_str(), v))
    }

    /// Apply every operation to `data`, resolving server timestamps to `now`.
    ///
    /// Array operations on an absent or non-array field start from an
    /// empty array.
    pub fn apply(&self, data: &mut Fields, now: &Value) {
        for (field, op) in &self.ops {
            match op {
                FieldValue::Set(value) => {
                    data.insert(field.clone(), value.clone());
                }
                FieldValue::ServerTimestamp => {
                    data.insert(field.clone(), now.clone());
                }
                FieldValue::ArrayUnion(values) => with_array(data, field, |items| {
                    for value in values {
                        if !items.contains(value) {
                            items.push(value.clone());
                        }
                    }
                }),
                FieldValue::ArrayRemove(values) => {
                    with_array(data, field, |items| items.retain(|v| !values.contains(v)));
                }
            }
        }
    }
}

fn with_array(data: &mut Fields, field: &str, f: impl FnOnce(&mut Vec<Value>)) {
    let mut items = match data.remove(field) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    f(&mut items);
    data.insert(field.to_string(), Value::Array(items));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
