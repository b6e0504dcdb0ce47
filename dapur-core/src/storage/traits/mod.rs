//! Storage trait definitions
//!
//! Implementations are in `implementations/`.

mod kv;

pub use kv::KeyValueStore;
