//! Error types for slottable
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two classes of outcome deliberately do NOT appear here: a full table
//! (signaled as `Ok(false)` from insert paths) and an absent row or field
//! (signaled as `Ok(None)`). Both are expected runtime results, not errors.

use std::io;
use thiserror::Error;

/// Result type alias for slottable operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the table engine and registry
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid schema definition or use (duplicate column, reserved name,
    /// zero-width string column, mutation after creation, type mismatch)
    #[error("schema error: {0}")]
    Schema(String),

    /// Row operation issued against a table that has not been created yet
    #[error("table {0:?} has not been created")]
    NotCreated(String),

    /// `create()` issued against a table that is already created
    #[error("table {0:?} has already been created")]
    AlreadyCreated(String),

    /// Registry lookup for an unknown table name
    #[error("no table registered under {0:?}")]
    TableNotFound(String),

    /// I/O error during snapshot dump/restore
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot file did not decode as a JSON array of row objects
    #[error("snapshot decode error: {0}")]
    Snapshot(String),
}
