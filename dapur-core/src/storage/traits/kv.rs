//! KeyValueStore trait for durable string storage

use anyhow::Result;
use async_trait::async_trait;

/// Durable key-value storage with string keys and string values.
///
/// All methods take `&self`; implementations use interior mutability.
/// Values survive process restarts for every backend except the in-memory one.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value. Readers never observe a partial write.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value by key.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key is present
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
