//! Table registry: process-wide name -> table lookup
//!
//! An explicit registry object rather than implicit global state: construct
//! one at process start and share it by reference with every component that
//! needs lookup-by-name. The registry keeps tables alive (it holds strong
//! references) and locatable; it never touches row data except for the
//! documented `clear_data` flush before removal.

use dashmap::DashMap;
use slottable_core::{ColumnDef, Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::table::SharedTable;

/// Name -> table mapping shared across components
///
/// Backed by a sharded concurrent map; all operations are safe to call from
/// multiple threads without external locking.
#[derive(Default)]
pub struct TableRegistry {
    tables: DashMap<String, Arc<SharedTable>>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        TableRegistry::default()
    }

    /// Build, create, and register a table in one step
    ///
    /// The table is created immediately with the given columns and stored
    /// under `name`, overwriting any prior entry for that name. Returns the
    /// new instance.
    pub fn create(
        &self,
        name: &str,
        capacity: usize,
        columns: &[ColumnDef],
    ) -> Result<Arc<SharedTable>> {
        let table = SharedTable::new(name, capacity);
        for column in columns {
            table.add_column(&column.name, column.ty)?;
        }
        table.create()?;

        let table = Arc::new(table);
        self.tables.insert(name.to_string(), Arc::clone(&table));
        debug!(table = name, capacity, columns = columns.len(), "Registered table");
        Ok(table)
    }

    /// Look up a table by name
    pub fn get(&self, name: &str) -> Result<Arc<SharedTable>> {
        self.tables
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Store or overwrite an externally constructed table under `name`
    pub fn set(&self, name: &str, table: Arc<SharedTable>) {
        self.tables.insert(name.to_string(), table);
        debug!(table = name, "Registered external table");
    }

    /// Remove the entry for `name`; report whether it was present
    pub fn del(&self, name: &str) -> bool {
        self.tables.remove(name).is_some()
    }

    /// Remove every entry
    ///
    /// With `clear_data`, each table's rows are flushed before removal; a
    /// registered table that was never created cannot be flushed and is
    /// logged and skipped.
    pub fn clear_all(&self, clear_data: bool) {
        if clear_data {
            for entry in self.tables.iter() {
                if let Err(e) = entry.value().flush() {
                    warn!(table = %entry.key(), error = %e, "Skipping flush during registry clear");
                }
            }
        }
        self.tables.clear();
        debug!(clear_data, "Cleared table registry");
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if no tables are registered
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Registered table names, in unspecified order
    pub fn names(&self) -> Vec<String> {
        self.tables.iter().map(|e| e.key().clone()).collect()
    }
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRegistry")
            .field("tables", &self.len())
            .finish()
    }
}
