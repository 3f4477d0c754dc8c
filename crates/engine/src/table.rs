//! SharedTable: fixed-capacity concurrent typed table
//!
//! A table is constructed uninitialized with a name and capacity, accumulates
//! column declarations, then transitions to created exactly once via
//! [`SharedTable::create`], which finalizes the schema (appending the
//! reserved key column) and allocates the slot arena. Every row operation
//! before that transition fails with a state error.
//!
//! ## Concurrency
//!
//! Row operations delegate to the slot store and are atomic per row; there
//! is no cross-row atomicity and no multi-row transactions. Same-key
//! concurrent writes race and the last physically-applied write wins.
//!
//! ## Persistence
//!
//! `dump`/`restore` move the row set to/from a JSON backing file, in
//! blocking (`std::fs`) or non-blocking (`tokio::fs`) flavors. Snapshot I/O
//! happens outside the table's locks; a dump concurrent with writers may
//! miss or include in-flight changes.

use crate::snapshot;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use slottable_core::{
    truncate_utf8, ColumnType, Error, Result, Row, Schema, SchemaBuilder, Value, KEY_FIELD,
    KEY_WIDTH,
};
use slottable_storage::SlotStore;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct Inner {
    schema: Arc<Schema>,
    store: SlotStore,
}

/// Fixed-capacity, key-addressed concurrent table
///
/// # Example
///
/// ```ignore
/// use slottable_engine::SharedTable;
/// use slottable_core::{ColumnType, Row};
///
/// let table = SharedTable::new("pages", 10);
/// table.add_column("name", ColumnType::FixedString(64))?;
/// table.add_column("views", ColumnType::Int32)?;
/// table.create()?;
///
/// table.set("a", &Row::new().with("name", "x").with("views", 0i64))?;
/// table.incr("a", "views", 5)?;
/// let row = table.get("a")?;
/// ```
pub struct SharedTable {
    name: String,
    capacity: usize,
    backing: Option<PathBuf>,
    pending: Mutex<SchemaBuilder>,
    inner: OnceCell<Inner>,
}

impl SharedTable {
    /// Construct an uninitialized table with a name and row capacity
    ///
    /// The name is a registry handle only; it does not derive a storage
    /// path. No storage is allocated until [`create`](Self::create).
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        SharedTable {
            name: name.into(),
            capacity,
            backing: None,
            pending: Mutex::new(SchemaBuilder::new()),
            inner: OnceCell::new(),
        }
    }

    /// Configure the snapshot backing file (consuming builder option)
    ///
    /// Without one, `dump` and `restore` are no-ops.
    pub fn with_backing_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.backing = Some(path.into());
        self
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared row capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured backing file, if any
    pub fn backing_file(&self) -> Option<&Path> {
        self.backing.as_deref()
    }

    /// Whether `create()` has completed
    pub fn is_created(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Declare a column on the pending schema
    ///
    /// Fails with a schema error after `create()`, on a duplicate name, a
    /// zero-width string column, or the reserved key name.
    pub fn add_column(&self, name: &str, ty: ColumnType) -> Result<()> {
        let mut pending = self.pending.lock();
        if self.inner.get().is_some() {
            return Err(Error::Schema(format!(
                "table {:?}: cannot add column {name:?} after create",
                self.name
            )));
        }
        pending.add_column(name, ty)
    }

    /// Finalize the schema and allocate the fixed-capacity storage
    ///
    /// Appends the reserved key column as the last physical column and
    /// transitions the table to created, exactly once. On any failure the
    /// table remains not-created.
    pub fn create(&self) -> Result<()> {
        let pending = self.pending.lock();
        if self.inner.get().is_some() {
            return Err(Error::AlreadyCreated(self.name.clone()));
        }
        if self.capacity == 0 {
            return Err(Error::Schema(format!(
                "table {:?}: capacity must be positive",
                self.name
            )));
        }

        let schema = Arc::new(pending.finish());
        let store = SlotStore::new(Arc::clone(&schema), self.capacity);
        let columns = schema.len();
        self.inner
            .set(Inner { schema, store })
            .map_err(|_| Error::AlreadyCreated(self.name.clone()))?;

        debug!(
            table = %self.name,
            capacity = self.capacity,
            columns,
            "Allocated table storage"
        );
        Ok(())
    }

    fn inner(&self) -> Result<&Inner> {
        self.inner
            .get()
            .ok_or_else(|| Error::NotCreated(self.name.clone()))
    }

    /// Keys share the reserved column's fixed width
    fn slot_key<'a>(&self, key: &'a str) -> &'a str {
        truncate_utf8(key, KEY_WIDTH as usize)
    }

    /// Write a row under `key`, overwriting any existing row
    ///
    /// The stored row is `row` merged with `{__key: key}`; omitted columns
    /// take their defaults. Returns `Ok(false)` when the table is full and
    /// `key` is new. Unknown fields and cross-kind values are schema errors.
    pub fn set(&self, key: &str, row: &Row) -> Result<bool> {
        let inner = self.inner()?;
        let key = self.slot_key(key);

        for (name, _) in row.iter() {
            if inner.schema.index_of(name).is_none() {
                return Err(Error::Schema(format!(
                    "table {:?}: unknown field {name:?}",
                    self.name
                )));
            }
        }

        let values = inner
            .schema
            .columns()
            .iter()
            .map(|c| {
                if c.name == KEY_FIELD {
                    Value::Str(key.to_string())
                } else {
                    row.get(&c.name)
                        .cloned()
                        .unwrap_or_else(|| c.ty.default_value())
                }
            })
            .collect();
        inner.store.insert_or_update(key, values)
    }

    /// Read the full row for `key`, or `None` if absent
    pub fn get(&self, key: &str) -> Result<Option<Row>> {
        let inner = self.inner()?;
        Ok(inner
            .store
            .get(self.slot_key(key))
            .map(|values| materialize(&inner.schema, values)))
    }

    /// Read a single field of the row for `key`
    ///
    /// `None` when the key is absent or the field is not in the schema.
    pub fn get_field(&self, key: &str, field: &str) -> Result<Option<Value>> {
        let inner = self.inner()?;
        let Some(idx) = inner.schema.index_of(field) else {
            return Ok(None);
        };
        Ok(inner.store.get_field(self.slot_key(key), idx))
    }

    /// Check whether a row exists for `key`
    pub fn exist(&self, key: &str) -> Result<bool> {
        let inner = self.inner()?;
        Ok(inner.store.contains(self.slot_key(key)))
    }

    /// Delete the row for `key`; `Ok(false)` if absent
    pub fn del(&self, key: &str) -> Result<bool> {
        let inner = self.inner()?;
        Ok(inner.store.remove(self.slot_key(key)))
    }

    /// Atomically add `amount` to a numeric field, returning the new value
    ///
    /// Integer fields wrap at the column's declared width (two's
    /// complement); float fields add `amount` as a float. `None` when the
    /// row is absent, the field is unknown, or the field holds a string.
    pub fn incr(&self, key: &str, field: &str, amount: i64) -> Result<Option<Value>> {
        let inner = self.inner()?;
        let Some(idx) = inner.schema.index_of(field) else {
            return Ok(None);
        };
        Ok(inner.store.add_numeric(self.slot_key(key), idx, amount))
    }

    /// Atomically subtract `amount` from a numeric field
    ///
    /// Symmetric to [`incr`](Self::incr), including the wrapping rule.
    pub fn decr(&self, key: &str, field: &str, amount: i64) -> Result<Option<Value>> {
        self.incr(key, field, amount.wrapping_neg())
    }

    /// Current number of live rows
    ///
    /// Approximate under heavy concurrent mutation, never above capacity.
    pub fn count(&self) -> Result<usize> {
        Ok(self.inner()?.store.len())
    }

    /// Visit every live row
    ///
    /// The traversal captures the key set at call time, order unspecified.
    /// The visitor receives row clones and may mutate the table freely;
    /// concurrent mutation never crashes the traversal.
    pub fn for_each<F: FnMut(Row)>(&self, mut visit: F) -> Result<()> {
        let inner = self.inner()?;
        let schema = Arc::clone(&inner.schema);
        inner.store.for_each(|values| visit(materialize(&schema, values)));
        Ok(())
    }

    /// Remove every row; afterwards `count()` is 0
    pub fn clear(&self) -> Result<()> {
        let inner = self.inner()?;
        inner.store.clear();
        debug!(table = %self.name, "Cleared table");
        Ok(())
    }

    /// Alias for [`clear`](Self::clear)
    pub fn flush(&self) -> Result<()> {
        self.clear()
    }

    fn collect_rows(&self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        self.for_each(|row| rows.push(row))?;
        Ok(rows)
    }

    /// Serialize all current rows to the backing file (blocking write)
    ///
    /// No-op without a backing file. The written content reflects the row
    /// set at iteration time, not an atomic cross-process snapshot. A
    /// failed dump leaves the in-memory table untouched.
    pub fn dump(&self) -> Result<()> {
        let Some(path) = self.backing.as_deref() else {
            debug!(table = %self.name, "No backing file configured, skipping dump");
            return Ok(());
        };
        let rows = self.collect_rows()?;
        let bytes = snapshot::encode(&rows)?;
        std::fs::write(path, &bytes)?;
        info!(
            table = %self.name,
            path = %path.display(),
            rows = rows.len(),
            "Dumped table snapshot"
        );
        Ok(())
    }

    /// Serialize all current rows to the backing file (non-blocking write)
    ///
    /// Identical content and semantics to [`dump`](Self::dump); only the
    /// calling task suspends during the write. Once issued, the write runs
    /// to completion or failure.
    pub async fn dump_async(&self) -> Result<()> {
        let Some(path) = self.backing.as_deref() else {
            debug!(table = %self.name, "No backing file configured, skipping dump");
            return Ok(());
        };
        let rows = self.collect_rows()?;
        let bytes = snapshot::encode(&rows)?;
        tokio::fs::write(path, &bytes).await?;
        info!(
            table = %self.name,
            path = %path.display(),
            rows = rows.len(),
            "Dumped table snapshot"
        );
        Ok(())
    }

    /// Load rows from the backing file (blocking read)
    ///
    /// No-op when no backing file is configured or the file does not exist.
    /// Every decoded element carrying a string `"text"` field is inserted
    /// keyed by that value; see [`snapshot`](crate::snapshot) for why the
    /// restore key differs from the reserved key field written at dump
    /// time. Malformed JSON is an error and mutates nothing.
    pub fn restore(&self) -> Result<()> {
        let Some(path) = self.backing.as_deref() else {
            debug!(table = %self.name, "No backing file configured, skipping restore");
            return Ok(());
        };
        self.inner()?;
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(table = %self.name, path = %path.display(), "No snapshot file, table left empty");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        self.apply_snapshot(&bytes)
    }

    /// Load rows from the backing file (non-blocking read)
    ///
    /// Identical semantics to [`restore`](Self::restore).
    pub async fn restore_async(&self) -> Result<()> {
        let Some(path) = self.backing.as_deref() else {
            debug!(table = %self.name, "No backing file configured, skipping restore");
            return Ok(());
        };
        self.inner()?;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(table = %self.name, path = %path.display(), "No snapshot file, table left empty");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        self.apply_snapshot(&bytes)
    }

    fn apply_snapshot(&self, bytes: &[u8]) -> Result<()> {
        let inner = self.inner()?;
        let entries = snapshot::decode(&inner.schema, bytes)?;
        let total = entries.len();
        let mut restored = 0usize;
        for (key, row) in entries {
            if self.set(&key, &row)? {
                restored += 1;
            } else {
                warn!(table = %self.name, key = %key, "Table full, dropping restored row");
            }
        }
        info!(
            table = %self.name,
            restored,
            dropped = total - restored,
            "Restored table snapshot"
        );
        Ok(())
    }
}

impl std::fmt::Debug for SharedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTable")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("created", &self.is_created())
            .field("backing", &self.backing)
            .finish()
    }
}

fn materialize(schema: &Schema, values: Box<[Value]>) -> Row {
    schema
        .columns()
        .iter()
        .zip(values.into_vec())
        .map(|(c, v)| (c.name.clone(), v))
        .collect()
}
