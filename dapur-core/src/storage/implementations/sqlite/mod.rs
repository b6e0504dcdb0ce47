//! SQLite storage backend
//!
//! Provides `SqliteKvStore` - a shared SQLite connection wrapper that
//! implements `KeyValueStore` over a single `kv` table.

mod kv;

pub use kv::SqliteKvStore;
