//! File-per-key storage
//!
//! Each key lives in its own file under the root directory, so replacing one
//! key never rewrites another. Writes go through a temp file that is synced
//! and renamed over the target, which keeps the previous value intact if the
//! process dies mid-write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::storage::helper::{key_file_name, key_from_file_name};
use crate::storage::traits::KeyValueStore;

/// Key-value storage on the filesystem
///
/// Layout: `{root}/{hex(key)}`
#[derive(Debug)]
pub struct FsKvStore {
    root: PathBuf,
    write_seq: AtomicU64,
}

impl FsKvStore {
    /// Create a new FsKvStore with the given root directory.
    ///
    /// The directory is created on first write.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_seq: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the filesystem path for a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key_file_name(key))
    }

    /// List the keys currently stored
    pub async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        if !fs::try_exists(&self.root).await? {
            return Ok(keys);
        }

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some() {
                continue;
            }
            if let Some(key) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(key_from_file_name)
            {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Clean up temp files orphaned by an interrupted write
    pub async fn cleanup_temp_files(&self) -> Result<usize> {
        let mut cleaned = 0;

        if !fs::try_exists(&self.root).await? {
            return Ok(0);
        }

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "tmp") {
                fs::remove_file(&path).await?;
                cleaned += 1;
            }
        }

        if cleaned > 0 {
            tracing::info!("Removed {} orphaned temp files from {}", cleaned, self.root.display());
        }
        Ok(cleaned)
    }

    fn temp_path_for(&self, path: &Path) -> PathBuf {
        // Unique per write so two in-flight writes to one key never share a temp file
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("{}.tmp", seq))
    }
}

#[async_trait]
impl KeyValueStore for FsKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(value) => Ok(Some(value)),
                // Undecodable bytes reach callers as malformed text, not as an I/O failure
                Err(e) => {
                    tracing::warn!("Key {} holds invalid UTF-8: {}", key, e.utf8_error());
                    Ok(Some(String::from_utf8_lossy(e.as_bytes()).into_owned()))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read key {}", key)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create store dir {}", self.root.display()))?;

        let path = self.path_for(key);
        let temp_path = self.temp_path_for(&path);

        let write = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &path).await
        };

        if let Err(e) = write.await {
            fs::remove_file(&temp_path).await.ok();
            return Err(e).with_context(|| format!("Failed to write key {}", key));
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove key {}", key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_kv_store() -> FsKvStore {
        let dir = env::temp_dir().join(format!("kv_test_{}", uuid::Uuid::new_v4()));
        FsKvStore::new(dir)
    }

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let store = temp_kv_store();

        store.set("@last_searches", "[]").await.unwrap();
        assert_eq!(store.get("@last_searches").await.unwrap().as_deref(), Some("[]"));

        fs::remove_dir_all(&store.root).await.ok();
    }

    #[tokio::test]
    async fn test_missing_key_and_missing_root() {
        let store = temp_kv_store();

        assert_eq!(store.get("vibrate").await.unwrap(), None);
        assert!(store.keys().await.unwrap().is_empty());
        store.remove("vibrate").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let store = temp_kv_store();
        store.set("fastMode", "true").await.unwrap();

        let reopened = FsKvStore::new(store.root.clone());
        assert_eq!(reopened.get("fastMode").await.unwrap().as_deref(), Some("true"));

        fs::remove_dir_all(&store.root).await.ok();
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let store = temp_kv_store();
        store.set("darkMode", "false").await.unwrap();
        store.set("darkMode", "true").await.unwrap();

        assert_eq!(store.get("darkMode").await.unwrap().as_deref(), Some("true"));
        assert_eq!(store.keys().await.unwrap(), vec!["darkMode".to_string()]);
        assert_eq!(store.cleanup_temp_files().await.unwrap(), 0);

        fs::remove_dir_all(&store.root).await.ok();
    }

    #[tokio::test]
    async fn test_cleanup_temp_files() {
        let store = temp_kv_store();
        store.set("vibrate", "true").await.unwrap();

        let orphan = store.path_for("vibrate").with_extension("7.tmp");
        fs::write(&orphan, "tru").await.unwrap();

        assert_eq!(store.cleanup_temp_files().await.unwrap(), 1);
        assert!(!orphan.exists());
        assert_eq!(store.get("vibrate").await.unwrap().as_deref(), Some("true"));

        fs::remove_dir_all(&store.root).await.ok();
    }

    #[tokio::test]
    async fn test_invalid_utf8_reads_as_text() {
        let store = temp_kv_store();
        fs::create_dir_all(&store.root).await.unwrap();
        fs::write(store.path_for("vibrate"), [0xff, 0xfe, 0x00]).await.unwrap();

        let value = store.get("vibrate").await.unwrap().unwrap();
        assert_ne!(value, "true");
        assert_ne!(value, "false");

        store.set("vibrate", "false").await.unwrap();
        assert_eq!(store.get("vibrate").await.unwrap().as_deref(), Some("false"));

        fs::remove_dir_all(&store.root).await.ok();
    }

    #[tokio::test]
    async fn test_remove() {
        let store = temp_kv_store();
        store.set("loggedInUser", "{}").await.unwrap();
        assert!(store.contains("loggedInUser").await.unwrap());

        store.remove("loggedInUser").await.unwrap();
        assert!(!store.contains("loggedInUser").await.unwrap());
        store.remove("loggedInUser").await.unwrap();

        fs::remove_dir_all(&store.root).await.ok();
    }
}
