//! Row type
//!
//! The exchange representation of one table record: a field-name -> value
//! mapping. Rows returned by the engine always carry the reserved key field;
//! rows passed in may omit any column, which then materializes as the
//! column's default.

use crate::schema::KEY_FIELD;
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;

/// One key-addressed table record
///
/// Serializes as a flat JSON object (field name -> scalar), which is exactly
/// one element of the snapshot file's array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Row::default()
    }

    /// Builder-style insert, for literal row construction
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The reserved key field, if present
    pub fn key(&self) -> Option<&str> {
        self.fields.get(KEY_FIELD).and_then(Value::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<HashMap<String, Value>> for Row {
    fn from(fields: HashMap<String, Value>) -> Self {
        Row { fields }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Row {
            fields: iter.into_iter().collect(),
        }
    }
}
