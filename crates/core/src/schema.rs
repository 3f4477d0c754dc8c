//! Column schema types
//!
//! A schema is an ordered set of typed, fixed-width column declarations.
//! It is accumulated through a [`SchemaBuilder`] while the owning table is
//! still uninitialized, then finalized exactly once at table creation, at
//! which point the reserved key column is appended as the last physical
//! column and the schema becomes immutable.
//!
//! ## Invariants
//!
//! - Column names are unique within a schema.
//! - `FixedString` widths are strictly positive.
//! - The reserved key column name cannot be declared by callers.
//! - A finalized [`Schema`] always ends with the reserved key column.

use crate::error::{Error, Result};
use crate::value::{truncate_utf8, Value};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Name of the reserved field holding each row's own key
pub const KEY_FIELD: &str = "__key";

/// Byte width of the reserved key column
pub const KEY_WIDTH: u32 = 255;

/// Column type descriptor: value kind plus fixed storage width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit floating point
    Float,
    /// UTF-8 string of at most the given number of bytes
    FixedString(u32),
}

impl ColumnType {
    /// Check whether increment/decrement applies to this column
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnType::FixedString(_))
    }

    /// The value an omitted field materializes as
    pub fn default_value(&self) -> Value {
        match self {
            ColumnType::Int8 | ColumnType::Int16 | ColumnType::Int32 | ColumnType::Int64 => {
                Value::Int(0)
            }
            ColumnType::Float => Value::Float(0.0),
            ColumnType::FixedString(_) => Value::Str(String::new()),
        }
    }

    /// Reduce an integer to this column's bit width
    ///
    /// Two's-complement truncation, the behavior of a raw fixed-width memory
    /// cell: `Int8` maps 300 to 44 and wraps `i8::MAX + 1` to `i8::MIN`.
    /// Non-integer column types pass the value through unchanged.
    pub fn wrap_int(&self, v: i64) -> i64 {
        match self {
            ColumnType::Int8 => v as i8 as i64,
            ColumnType::Int16 => v as i16 as i64,
            ColumnType::Int32 => v as i32 as i64,
            ColumnType::Int64 => v,
            ColumnType::Float | ColumnType::FixedString(_) => v,
        }
    }

    /// Fit a value into this column, or reject it
    ///
    /// Width adjustments happen here (integer wrapping, string truncation).
    /// Cross-kind writes return `None`; they are never reinterpreted.
    pub fn conform(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (ColumnType::Float, Value::Float(f)) => Some(Value::Float(f)),
            (ColumnType::FixedString(width), Value::Str(s)) => {
                let truncated = truncate_utf8(&s, *width as usize);
                if truncated.len() == s.len() {
                    Some(Value::Str(s))
                } else {
                    Some(Value::Str(truncated.to_string()))
                }
            }
            (ty, Value::Int(v)) if ty.is_numeric() && *ty != ColumnType::Float => {
                Some(Value::Int(ty.wrap_int(v)))
            }
            _ => None,
        }
    }

    /// Get the type name as a string (for error messages)
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int8 => "Int8",
            ColumnType::Int16 => "Int16",
            ColumnType::Int32 => "Int32",
            ColumnType::Int64 => "Int64",
            ColumnType::Float => "Float",
            ColumnType::FixedString(_) => "FixedString",
        }
    }
}

/// A single named, typed column declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Field name, unique within the table
    pub name: String,
    /// Type and width of the column
    pub ty: ColumnType,
}

impl ColumnDef {
    /// Create a column definition
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered, validating accumulator for column declarations
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    columns: Vec<ColumnDef>,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        SchemaBuilder::default()
    }

    /// Declare a column
    ///
    /// Fails with a schema error on a duplicate name, a zero-width string
    /// column, or an attempt to declare the reserved key column.
    pub fn add_column(&mut self, name: &str, ty: ColumnType) -> Result<()> {
        if name == KEY_FIELD {
            return Err(Error::Schema(format!(
                "column name {KEY_FIELD:?} is reserved"
            )));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(Error::Schema(format!("duplicate column {name:?}")));
        }
        if ty == ColumnType::FixedString(0) {
            return Err(Error::Schema(format!(
                "column {name:?}: string width must be positive"
            )));
        }
        self.columns.push(ColumnDef::new(name, ty));
        Ok(())
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if no columns have been declared
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Finalize into an immutable [`Schema`]
    ///
    /// Appends the reserved key column as the last physical column.
    pub fn finish(&self) -> Schema {
        let mut columns = self.columns.clone();
        columns.push(ColumnDef::new(KEY_FIELD, ColumnType::FixedString(KEY_WIDTH)));

        let by_name = columns
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.name.clone(), idx))
            .collect::<FxHashMap<_, _>>();
        let key_index = columns.len() - 1;

        Schema {
            columns,
            by_name,
            key_index,
        }
    }
}

/// Finalized, immutable column schema
///
/// Holds the declared columns in order, terminated by the reserved key
/// column, plus a name index for O(1) field lookup.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    by_name: FxHashMap<String, usize>,
    key_index: usize,
}

impl Schema {
    /// All columns in physical order, reserved key column last
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Total number of physical columns (including the key column)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// A finalized schema always contains at least the key column
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column's physical index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Column definition at a physical index
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds; indices come from `index_of`.
    pub fn column(&self, idx: usize) -> &ColumnDef {
        &self.columns[idx]
    }

    /// Physical index of the reserved key column (always the last)
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// Fit a dense value row to this schema
    ///
    /// Applies per-column width adjustment; rejects cross-kind values and
    /// rows of the wrong arity with a schema error.
    pub fn conform_row(&self, values: Vec<Value>) -> Result<Box<[Value]>> {
        if values.len() != self.columns.len() {
            return Err(Error::Schema(format!(
                "row has {} values, schema has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        values
            .into_iter()
            .zip(&self.columns)
            .map(|(v, c)| {
                let kind = v.type_name();
                c.ty.conform(v).ok_or_else(|| {
                    Error::Schema(format!(
                        "column {:?} is {}, got {}",
                        c.name,
                        c.ty.name(),
                        kind
                    ))
                })
            })
            .collect()
    }
}
