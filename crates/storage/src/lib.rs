//! Fixed-capacity concurrent row storage
//!
//! This crate provides [`SlotStore`], the storage capability the table
//! engine is built on: a bounded, key-addressed, concurrently-mutable set of
//! fixed-width typed rows.
//!
//! # Design
//!
//! - DashMap key index: sharded by default, lock-free reads, per-shard writes
//! - Preallocated slot arena: row data lives in `capacity` independent slots
//! - Free list: deleted slots are recycled, memory never grows past capacity
//! - Slots are arena indices, never pointers
//!
//! # Thread Safety
//!
//! Every per-row operation is atomic at row-slot granularity. Lock order is
//! uniform (index shard, then slot), so any mix of concurrent operations on
//! any keys is deadlock-free. There is no cross-row atomicity.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod slot_store;

pub use slot_store::SlotStore;
