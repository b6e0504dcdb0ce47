//! Mock storage implementations for testing
//!
//! Wrappers that inject storage failures so the recovery paths of the
//! preference store and recency lists can be exercised.

mod flaky;

pub use flaky::FlakyKvStore;
