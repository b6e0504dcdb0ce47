//! Durable key-value storage
//!
//! The `KeyValueStore` trait is the only contract the preference store and
//! recency lists rely on. Backends live in `implementations/`:
//!
//! - `MemoryKvStore` - in-memory, nothing survives the process
//! - `FsKvStore` - one file per key, atomic replace on write
//! - `SqliteKvStore` - single `kv` table (requires `sqlite` feature)

pub mod helper;
pub mod ids;
pub mod implementations;
pub mod traits;
pub mod types;

use anyhow::{Context, Result};
use config::{Settings, StorageBackend};
use std::sync::Arc;

pub use traits::KeyValueStore;

/// Open the durable store selected in settings
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn KeyValueStore>> {
    match settings.backend {
        StorageBackend::Memory => {
            tracing::debug!("Opening in-memory store");
            Ok(Arc::new(implementations::memory::MemoryKvStore::new()))
        }
        StorageBackend::Fs => {
            let root = settings
                .resolved_data_dir()
                .context("Could not determine data directory")?
                .join("store");
            tracing::debug!("Opening filesystem store at {}", root.display());
            let store = implementations::fs::FsKvStore::new(root);
            if let Err(e) = store.cleanup_temp_files().await {
                tracing::warn!("Failed to clean up temp files in {}: {:#}", store.root().display(), e);
            }
            Ok(Arc::new(store))
        }
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            let path = settings
                .resolved_data_dir()
                .context("Could not determine data directory")?
                .join("dapur.db");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tracing::debug!("Opening SQLite store at {}", path.display());
            Ok(Arc::new(implementations::sqlite::SqliteKvStore::open(&path)?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => {
            anyhow::bail!("SQLite backend requested but dapur-core was built without the `sqlite` feature")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_store() {
        let settings = Settings {
            backend: StorageBackend::Memory,
            ..Settings::default()
        };
        let store = open_store(&settings).await.unwrap();
        store.set("vibrate", "false").await.unwrap();
        assert_eq!(store.get("vibrate").await.unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_open_fs_store_under_data_dir() {
        let dir = std::env::temp_dir().join(format!("dapur_open_{}", uuid::Uuid::new_v4()));
        let settings = Settings {
            backend: StorageBackend::Fs,
            data_dir: Some(dir.clone()),
            ..Settings::default()
        };
        let store = open_store(&settings).await.unwrap();
        store.set("fastMode", "true").await.unwrap();
        assert!(dir.join("store").exists());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_open_fs_store_removes_orphaned_temp_files() {
        let dir = std::env::temp_dir().join(format!("dapur_open_{}", uuid::Uuid::new_v4()));
        let orphan = dir
            .join("store")
            .join(format!("{}.3.tmp", helper::key_file_name("vibrate")));
        tokio::fs::create_dir_all(orphan.parent().unwrap()).await.unwrap();
        tokio::fs::write(&orphan, "fal").await.unwrap();

        let settings = Settings {
            backend: StorageBackend::Fs,
            data_dir: Some(dir.clone()),
            ..Settings::default()
        };
        let store = open_store(&settings).await.unwrap();

        assert!(!orphan.exists());
        assert_eq!(store.get("vibrate").await.unwrap(), None);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[cfg(not(feature = "sqlite"))]
    #[tokio::test]
    async fn test_sqlite_without_feature_fails() {
        let settings = Settings {
            backend: StorageBackend::Sqlite,
            data_dir: Some(std::env::temp_dir()),
            ..Settings::default()
        };
        assert!(open_store(&settings).await.is_err());
    }
}
