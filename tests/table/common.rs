//! Shared helpers for the integration suite

use slottable::{ColumnType, SharedTable};
use std::path::PathBuf;

/// A created table with `{name: string(64), views: int32}` columns
pub fn page_table(capacity: usize) -> SharedTable {
    let table = SharedTable::new("pages", capacity);
    table.add_column("name", ColumnType::FixedString(64)).unwrap();
    table.add_column("views", ColumnType::Int32).unwrap();
    table.create().unwrap();
    table
}

/// A created table whose schema includes a `text` column (the restore key
/// field), backed by the given snapshot file
pub fn feed_table_at(path: impl Into<PathBuf>, capacity: usize) -> SharedTable {
    let table = SharedTable::new("feed", capacity).with_backing_file(path);
    table.add_column("text", ColumnType::FixedString(128)).unwrap();
    table.add_column("votes", ColumnType::Int32).unwrap();
    table.create().unwrap();
    table
}
