//! Failure-injecting KeyValueStore wrapper

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::storage::implementations::memory::MemoryKvStore;
use crate::storage::traits::KeyValueStore;

/// Delegates to an inner store until told to fail
#[derive(Debug, Default)]
pub struct FlakyKvStore<S = MemoryKvStore> {
    inner: S,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyKvStore<MemoryKvStore> {
    pub fn new() -> Self {
        Self::wrap(MemoryKvStore::new())
    }
}

impl<S: KeyValueStore> FlakyKvStore<S> {
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Make `get` fail until reset
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `set` and `remove` fail until reset
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for FlakyKvStore<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("injected read failure for key {}", key);
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("injected write failure for key {}", key);
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("injected remove failure for key {}", key);
        }
        self.inner.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_toggles() {
        let store = FlakyKvStore::new();
        store.set("vibrate", "true").await.unwrap();

        store.fail_writes(true);
        assert!(store.set("vibrate", "false").await.is_err());
        assert!(store.remove("vibrate").await.is_err());
        assert_eq!(store.get("vibrate").await.unwrap().as_deref(), Some("true"));

        store.fail_reads(true);
        assert!(store.get("vibrate").await.is_err());

        store.fail_reads(false);
        store.fail_writes(false);
        store.set("vibrate", "false").await.unwrap();
        assert_eq!(store.inner().get("vibrate").await.unwrap().as_deref(), Some("false"));
    }
}
