//! Storage implementations
//!
//! ## Available Implementations
//!
//! - `sqlite/` - SQLite-based storage (requires `sqlite` feature)
//! - `memory/` - In-memory storage for testing
//! - `fs/` - One file per key on the filesystem
//! - `mock/` - Failure-injecting wrapper for testing error paths

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod fs;
pub mod memory;
pub mod mock;
