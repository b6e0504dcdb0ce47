//! Session, preference and recent-search state for the dapur recipe app
//!
//! This crate provides:
//! - **Storage**: the `KeyValueStore` trait with memory, filesystem and SQLite backends
//! - **PreferenceStore**: session identity plus the `vibrate`/`fastMode`/`darkMode` flags
//! - **RecencyList**: bounded, deduplicated most-recent-first lists such as "last searches"
//! - **Search/Profile**: client-side catalog filtering and the settings-screen profile view
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dapur_core::{PreferenceStore, RecencyList, RecipeSummary};
//! use dapur_core::storage::implementations::memory::MemoryKvStore;
//!
//! let store = Arc::new(MemoryKvStore::new());
//! let prefs = PreferenceStore::new(store.clone());
//! prefs.initialize().await;
//! let searches: RecencyList<RecipeSummary, _> = RecencyList::last_searches(store);
//! ```
pub mod error;
pub mod preferences;
pub mod profile;
pub mod recency;
pub mod search;
pub mod storage;

pub use error::StoreError;
pub use preferences::{PreferenceSnapshot, PreferenceStore};
pub use profile::ProfileView;
pub use recency::{DuplicatePolicy, RecencyConfig, RecencyList, LAST_SEARCHES_KEY, SEARCH_HISTORY_KEY};
pub use search::{load_catalog, RecipeQuery, CATEGORIES};
pub use storage::{open_store, KeyValueStore};
pub use storage::ids::UserId;
pub use storage::types::{Identified, Preference, RecipeId, RecipeSummary, UserRecord};
