//! SQLite implementation of KeyValueStore

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::storage::helper::unix_timestamp;
use crate::storage::traits::KeyValueStore;

pub(crate) fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )
    .context("Failed to initialize kv schema")?;
    Ok(())
}

/// Key-value store backed by one SQLite table.
///
/// Create one store and share it via `Arc`.
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory SQLite database (useful for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Milliseconds timestamp of the last write to a key
    pub fn updated_at(&self, key: &str) -> Result<Option<i64>> {
        let conn = self.conn.lock().unwrap();
        let ts = conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts)
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read key {}", key))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, unix_timestamp()],
        )
        .with_context(|| format!("Failed to write key {}", key))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove key {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_remove() {
        let store = SqliteKvStore::in_memory().unwrap();

        assert_eq!(store.get("vibrate").await.unwrap(), None);
        store.set("vibrate", "true").await.unwrap();
        store.set("vibrate", "false").await.unwrap();
        assert_eq!(store.get("vibrate").await.unwrap().as_deref(), Some("false"));
        assert!(store.updated_at("vibrate").unwrap().is_some());

        store.remove("vibrate").await.unwrap();
        store.remove("vibrate").await.unwrap();
        assert_eq!(store.get("vibrate").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = std::env::temp_dir().join(format!("kv_{}.db", uuid::Uuid::new_v4()));
        {
            let store = SqliteKvStore::open(&path).unwrap();
            store.set("@last_searches", "[{\"id\":1,\"title\":\"Rendang\"}]").await.unwrap();
        }

        let store = SqliteKvStore::open(&path).unwrap();
        assert_eq!(
            store.get("@last_searches").await.unwrap().as_deref(),
            Some("[{\"id\":1,\"title\":\"Rendang\"}]")
        );

        std::fs::remove_file(&path).ok();
    }
}
