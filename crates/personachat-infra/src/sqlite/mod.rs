//! SQLite storage layer.
//!
//! The local key-value substrate backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod kv;
pub mod pool;
