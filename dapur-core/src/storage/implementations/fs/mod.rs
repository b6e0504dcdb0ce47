//! Filesystem storage implementations

mod kv;

pub use kv::FsKvStore;
