//! Core types for slottable
//!
//! This crate defines the foundational types used throughout the system:
//! - ColumnType / ColumnDef: typed, fixed-width column declarations
//! - SchemaBuilder / Schema: ordered column sets, immutable once finalized
//! - Value: tagged value for a single table cell
//! - Row: field-name -> value mapping exchanged with callers
//! - Error: error type hierarchy shared by every crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod row;
pub mod schema;
pub mod value;

pub use error::{Error, Result};
pub use row::Row;
pub use schema::{ColumnDef, ColumnType, Schema, SchemaBuilder, KEY_FIELD, KEY_WIDTH};
pub use value::{truncate_utf8, Value};
