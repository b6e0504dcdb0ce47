//! Bounded most-recent-first lists
//!
//! A `RecencyList` keeps at most `capacity` entries, newest first, with no two
//! entries sharing an id. Each list owns one storage key, so several lists
//! (home screen, search screen) can live side by side in the same store.

use std::sync::{Arc, Mutex};

use config::{DuplicatePolicySetting, Settings};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::storage::traits::KeyValueStore;
use crate::storage::types::{Identified, RecipeSummary};

/// Recent searches shown on the home screen
pub const LAST_SEARCHES_KEY: &str = "@last_searches";
/// Recent picks from the search and notification screens
pub const SEARCH_HISTORY_KEY: &str = "@last_search";

pub const DEFAULT_CAPACITY: usize = config::settings::DEFAULT_RECENT_CAPACITY;

/// What `add` does with an entry whose id is already listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Remove the old occurrence and insert the new entry at the front
    #[default]
    PromoteToFront,
    /// Leave the list as it is; nothing is written
    KeepExisting,
}

impl From<DuplicatePolicySetting> for DuplicatePolicy {
    fn from(setting: DuplicatePolicySetting) -> Self {
        match setting {
            DuplicatePolicySetting::Promote => DuplicatePolicy::PromoteToFront,
            DuplicatePolicySetting::Keep => DuplicatePolicy::KeepExisting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyConfig {
    /// Storage key owned by the list
    pub key: String,
    /// Maximum number of entries, at least 1
    pub capacity: usize,
    pub policy: DuplicatePolicy,
}

impl RecencyConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            capacity: DEFAULT_CAPACITY,
            policy: DuplicatePolicy::default(),
        }
    }

    /// Capacity is clamped to at least 1
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_settings(key: impl Into<String>, settings: &Settings) -> Self {
        Self::new(key)
            .with_capacity(settings.effective_recent_capacity())
            .with_policy(settings.duplicate_policy.into())
    }
}

/// Insert `entry` at the front of `entries`.
///
/// Returns `None` when the policy says to leave the list alone.
pub fn push_front_bounded<T: Identified>(
    mut entries: Vec<T>,
    entry: T,
    capacity: usize,
    policy: DuplicatePolicy,
) -> Option<Vec<T>> {
    if let Some(pos) = entries.iter().position(|e| e.id() == entry.id()) {
        match policy {
            DuplicatePolicy::KeepExisting => return None,
            DuplicatePolicy::PromoteToFront => {
                entries.remove(pos);
            }
        }
    }

    entries.insert(0, entry);
    entries.truncate(capacity.max(1));
    Some(entries)
}

/// Drop repeated ids (first occurrence wins) and anything past capacity
fn normalize<T: Identified>(entries: Vec<T>, capacity: usize) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(entries.len().min(capacity));
    for entry in entries {
        if kept.len() == capacity {
            break;
        }
        if !kept.iter().any(|k| k.id() == entry.id()) {
            kept.push(entry);
        }
    }
    kept
}

/// Persisted most-recently-used list.
///
/// Callers are expected to await each mutation before issuing the next one on
/// the same list; two unawaited `add`s race and the last write wins.
pub struct RecencyList<T, S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    config: RecencyConfig,
    cache: Mutex<Option<Vec<T>>>,
}

impl<S: KeyValueStore + ?Sized> RecencyList<RecipeSummary, S> {
    /// The home screen's recent-search list with default settings
    pub fn last_searches(store: Arc<S>) -> Self {
        Self::new(store, RecencyConfig::new(LAST_SEARCHES_KEY))
    }
}

impl<T, S> RecencyList<T, S>
where
    T: Identified + Clone + Serialize + DeserializeOwned + Send + Sync,
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>, config: RecencyConfig) -> Self {
        let config = RecencyConfig {
            capacity: config.capacity.max(1),
            ..config
        };
        Self {
            store,
            config,
            cache: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.config.policy
    }

    /// Cached entries from the last load or successful write; empty before the first load
    pub fn entries(&self) -> Vec<T> {
        self.cache.lock().unwrap().clone().unwrap_or_default()
    }

    /// Read the list from storage. Missing, unreadable or malformed data
    /// yields an empty list; the failure is logged.
    pub async fn load(&self) -> Vec<T> {
        match self.read().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", self.config.key, e);
                Vec::new()
            }
        }
    }

    /// Record `entry` as most recent and return the resulting list.
    ///
    /// A storage failure is logged; the returned list still shows the attempted
    /// change but the cache keeps the last persisted state.
    pub async fn add(&self, entry: T) -> Vec<T> {
        let (attempted, result) = self.apply_add(entry).await;
        if let Err(e) = result {
            tracing::warn!("Failed to save {}: {}", self.config.key, e);
        }
        attempted
    }

    /// Like [`add`](Self::add) but reports storage failures
    pub async fn try_add(&self, entry: T) -> Result<Vec<T>, StoreError> {
        let (attempted, result) = self.apply_add(entry).await;
        result.map(|_| attempted)
    }

    /// Empty the list and delete its key. Failures are logged.
    pub async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            tracing::warn!("Failed to clear {}: {}", self.config.key, e);
        }
    }

    pub async fn try_clear(&self) -> Result<(), StoreError> {
        self.store
            .remove(&self.config.key)
            .await
            .map_err(|e| StoreError::persistence(&self.config.key, format!("{:#}", e)))?;
        *self.cache.lock().unwrap() = Some(Vec::new());
        tracing::debug!("Cleared {}", self.config.key);
        Ok(())
    }

    async fn apply_add(&self, entry: T) -> (Vec<T>, Result<(), StoreError>) {
        let cached = self.cache.lock().unwrap().clone();
        let (current, read_result) = match cached {
            Some(entries) => (entries, Ok(())),
            None => match self.read().await {
                Ok(entries) => (entries, Ok(())),
                Err(e) => (Vec::new(), Err(e)),
            },
        };

        let Some(next) =
            push_front_bounded(current.clone(), entry, self.config.capacity, self.config.policy)
        else {
            return (current, read_result);
        };

        // Without the stored list we'd overwrite it with a one-entry list
        if let Err(e) = read_result {
            return (next, Err(e));
        }

        let result = self.write(&next).await;
        if result.is_ok() {
            *self.cache.lock().unwrap() = Some(next.clone());
        }
        (next, result)
    }

    async fn read(&self) -> Result<Vec<T>, StoreError> {
        let raw = self
            .store
            .get(&self.config.key)
            .await
            .map_err(|e| StoreError::persistence(&self.config.key, format!("{:#}", e)))?;

        let entries = match raw {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(entries) => normalize(entries, self.config.capacity),
                Err(e) => {
                    tracing::warn!("Ignoring malformed {}: {}", self.config.key, e);
                    Vec::new()
                }
            },
        };

        *self.cache.lock().unwrap() = Some(entries.clone());
        Ok(entries)
    }

    async fn write(&self, entries: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries)
            .map_err(|e| StoreError::InvalidRecord(format!("failed to serialize {}: {}", self.config.key, e)))?;
        self.store
            .set(&self.config.key, &json)
            .await
            .map_err(|e| StoreError::persistence(&self.config.key, format!("{:#}", e)))?;
        tracing::debug!("Saved {} ({} entries)", self.config.key, entries.len());
        Ok(())
    }
}
