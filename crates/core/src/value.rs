//! Value types for slottable
//!
//! A table cell holds exactly one of three value kinds: a signed integer, a
//! float, or a string. The declared column type fixes the *width* of the
//! cell (integer bit width, maximum string bytes); the `Value` enum itself
//! carries the widest representation and the storage layer narrows on write.
//!
//! ## Type Rules
//!
//! - No implicit cross-type coercions: an `Int` never becomes a `Float` or a
//!   `Str` on its way into a column, it is rejected instead.
//! - Width adjustments are allowed within a kind: integers are reduced to the
//!   column's bit width by two's-complement truncation, strings are cut to
//!   the column's byte width on a UTF-8 character boundary.
//! - Float equality follows IEEE-754: `NaN != NaN`, `-0.0 == 0.0`.

use serde::{Serialize, Serializer};

/// A single table cell value
///
/// Serializes as a plain JSON scalar (number or string), which is the
/// snapshot file representation. Decoding is schema-directed and lives with
/// the snapshot codec, so `Value` does not implement `Deserialize`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer, stored at the column's declared bit width
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string, stored up to the column's declared byte width
    Str(String),
}

impl Value {
    /// Get the value kind as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
        }
    }

    /// Check if this is an integer value
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if this is a float value
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this is a string value
    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as &str if this is a Str value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Truncate a string to at most `max_bytes` bytes on a UTF-8 boundary
///
/// The result is always a prefix of the input and always valid UTF-8. A
/// multi-byte character straddling the limit is dropped entirely.
pub fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
