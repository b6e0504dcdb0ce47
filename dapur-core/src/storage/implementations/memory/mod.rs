//! In-memory storage implementations for testing
//!
//! Useful for unit tests and for sessions that should leave nothing on disk.

mod kv;

pub use kv::MemoryKvStore;
