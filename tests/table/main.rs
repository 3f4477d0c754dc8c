//! Integration tests for the slottable facade
//!
//! Run with: cargo test --test table

mod common;

mod async_io;
mod lifecycle;
mod ops;
