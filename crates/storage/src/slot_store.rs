//! Slot store: bounded concurrent row storage
//!
//! Rows live in a preallocated arena of `capacity` slots; a sharded key
//! index maps row keys to slot indices, and a free list recycles slots of
//! deleted rows. Storage slots are reused, arena memory is never grown.
//!
//! # Critical Invariants
//!
//! - The key index is the sole way to reach a live slot.
//! - A slot enters the free list only after its row data is cleared.
//! - The live counter never exceeds the declared capacity.
//! - Lock order is always index shard first, slot second.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use slottable_core::{Result, Schema, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

type SlotData = Option<Box<[Value]>>;

/// Fixed-capacity concurrent row store
///
/// The capability layer under the table engine: key-addressed get/set/
/// remove/add of fixed-width typed rows, bounded by a capacity fixed at
/// construction.
///
/// # Thread Safety
///
/// - `get`/`contains`: shard read lock + slot read lock
/// - `insert_or_update`/`remove`/`add_numeric`: shard write lock + slot
///   write lock, one row at a time
/// - `for_each`: snapshots the key set, then visits without internal locks
pub struct SlotStore {
    schema: Arc<Schema>,
    /// Row key -> arena slot index
    index: DashMap<String, usize>,
    /// Preallocated arena; slot count equals the declared capacity
    slots: Box<[RwLock<SlotData>]>,
    /// Recyclable slot indices; popped on insert, pushed after a clear
    free: Mutex<Vec<usize>>,
    live: AtomicUsize,
}

impl SlotStore {
    /// Allocate a store with the given schema and row capacity
    pub fn new(schema: Arc<Schema>, capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| RwLock::new(None))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        // Reverse so the first insert takes slot 0
        let free = (0..capacity).rev().collect();

        SlotStore {
            schema,
            index: DashMap::with_capacity(capacity),
            slots,
            free: Mutex::new(free),
            live: AtomicUsize::new(0),
        }
    }

    /// The schema rows conform to
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Declared row capacity
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current number of live rows
    ///
    /// Approximate under concurrent mutation, never above capacity.
    pub fn len(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Check if no rows are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write a full row under `key`, overwriting any existing row
    ///
    /// Values are conformed to the schema (integers wrapped to the column
    /// width, strings truncated); a cross-kind value is a schema error.
    /// Returns `Ok(false)` when the key is new and every slot is taken.
    pub fn insert_or_update(&self, key: &str, values: Vec<Value>) -> Result<bool> {
        let row = self.schema.conform_row(values)?;

        match self.index.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                *self.slots[*entry.get()].write() = Some(row);
                Ok(true)
            }
            Entry::Vacant(entry) => {
                let Some(slot) = self.free.lock().pop() else {
                    trace!(key, "Arena full, rejecting insert");
                    return Ok(false);
                };
                *self.slots[slot].write() = Some(row);
                entry.insert(slot);
                self.live.fetch_add(1, Ordering::AcqRel);
                Ok(true)
            }
        }
    }

    /// Read a full row clone
    pub fn get(&self, key: &str) -> Option<Box<[Value]>> {
        let slot = self.index.get(key)?;
        self.slots[*slot].read().clone()
    }

    /// Read a single field clone by physical column index
    pub fn get_field(&self, key: &str, idx: usize) -> Option<Value> {
        let slot = self.index.get(key)?;
        self.slots[*slot].read().as_ref().and_then(|row| row.get(idx).cloned())
    }

    /// Check whether a row is live for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove the row for `key`; the slot returns to the free list
    pub fn remove(&self, key: &str) -> bool {
        let Some((_, slot)) = self.index.remove(key) else {
            return false;
        };
        *self.slots[slot].write() = None;
        self.free.lock().push(slot);
        self.live.fetch_sub(1, Ordering::AcqRel);
        true
    }

    /// Atomically add `delta` to a numeric field, returning the new value
    ///
    /// Integer columns wrap at the column's declared width (two's
    /// complement); float columns add `delta` as a float. Returns `None`
    /// when the row is absent or the field holds a string.
    pub fn add_numeric(&self, key: &str, idx: usize, delta: i64) -> Option<Value> {
        let slot = self.index.get(key)?;
        let mut guard = self.slots[*slot].write();
        let row = guard.as_mut()?;

        match row.get_mut(idx)? {
            Value::Int(v) => {
                let next = self.schema.column(idx).ty.wrap_int(v.wrapping_add(delta));
                *v = next;
                Some(Value::Int(next))
            }
            Value::Float(f) => {
                *f += delta as f64;
                Some(Value::Float(*f))
            }
            Value::Str(_) => None,
        }
    }

    /// Visit a clone of every live row
    ///
    /// The key set is captured up front, then each row is cloned out with no
    /// internal lock held during the visit, so the visitor may freely mutate
    /// the store. Rows deleted after the capture are skipped; a slot freed
    /// and reassigned mid-traversal is detected by comparing the stored key
    /// field against the captured key and skipped as well.
    pub fn for_each<F: FnMut(Box<[Value]>)>(&self, mut visit: F) {
        let entries: Vec<(String, usize)> = self
            .index
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        let key_idx = self.schema.key_index();

        for (key, slot) in entries {
            let row = self.slots[slot].read().clone();
            let Some(row) = row else { continue };
            let current = matches!(row.get(key_idx), Some(Value::Str(stored)) if *stored == key);
            if current {
                visit(row);
            }
        }
    }

    /// Remove every live row
    ///
    /// Iterates and deletes key by key; rows inserted concurrently with the
    /// sweep may survive it.
    pub fn clear(&self) {
        let keys: Vec<String> = self.index.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            self.remove(&key);
        }
    }
}

impl std::fmt::Debug for SlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotStore")
            .field("capacity", &self.capacity())
            .field("live", &self.len())
            .finish()
    }
}
