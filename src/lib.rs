//! Slottable - fixed-capacity concurrent typed key-value tables
//!
//! Slottable shares typed tabular state across the worker threads of a
//! single host without per-access serialization: a table is a bounded set of
//! fixed-width rows addressed by string key, safe for concurrent mutation at
//! row granularity, with optional JSON snapshot persistence and a
//! process-wide registry for lookup by name.
//!
//! # Quick Start
//!
//! ```ignore
//! use slottable::{ColumnType, Row, SharedTable};
//!
//! let table = SharedTable::new("pages", 10);
//! table.add_column("name", ColumnType::FixedString(64))?;
//! table.add_column("views", ColumnType::Int32)?;
//! table.create()?;
//!
//! table.set("a", &Row::new().with("name", "x").with("views", 0i64))?;
//! table.incr("a", "views", 5)?;
//! assert_eq!(table.get_field("a", "views")?, Some(slottable::Value::Int(5)));
//! ```
//!
//! # Architecture
//!
//! The engine crate owns table semantics; the storage crate owns the
//! fixed-capacity concurrent slot arena; the core crate owns schemas,
//! values, rows, and errors. This facade re-exports the public surface.

pub use slottable_core::{
    ColumnDef, ColumnType, Error, Result, Row, Schema, SchemaBuilder, Value, KEY_FIELD, KEY_WIDTH,
};
pub use slottable_engine::{snapshot, SharedTable, TableRegistry};
pub use slottable_storage::SlotStore;
