//! Session identity and boolean UI preferences
//!
//! `PreferenceStore` is the single authority for who is registered, who is
//! logged in and how the `vibrate` / `fastMode` / `darkMode` flags are set.
//! Construct one per process and hand it (usually behind an `Arc`) to every
//! consumer that needs it.
//!
//! Every mutation writes to the durable store first and only then updates the
//! in-memory snapshot, so a failed write leaves the snapshot untouched and the
//! store remains the source of truth.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreError;
use crate::profile::ProfileView;
use crate::storage::traits::KeyValueStore;
use crate::storage::types::{Preference, UserRecord};

/// Storage key of the long-lived registered user
pub const REGISTERED_USER_KEY: &str = "registeredUser";
/// Storage key of the current session's user
pub const LOGGED_IN_USER_KEY: &str = "loggedInUser";

/// Point-in-time view of everything the store caches
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSnapshot {
    pub registered_user: Option<UserRecord>,
    pub logged_in_user: Option<UserRecord>,
    pub vibrate: bool,
    pub fast_mode: bool,
    /// `None` until something asks for it
    pub dark_mode: Option<bool>,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            registered_user: None,
            logged_in_user: None,
            vibrate: Preference::Vibrate.default_value(),
            fast_mode: Preference::FastMode.default_value(),
            dark_mode: None,
        }
    }
}

impl PreferenceSnapshot {
    /// Cached value of a flag, with unloaded `darkMode` reading as its default
    pub fn flag(&self, pref: Preference) -> bool {
        match pref {
            Preference::Vibrate => self.vibrate,
            Preference::FastMode => self.fast_mode,
            Preference::DarkMode => self.dark_mode.unwrap_or(pref.default_value()),
        }
    }

    fn set_flag(&mut self, pref: Preference, value: bool) {
        match pref {
            Preference::Vibrate => self.vibrate = value,
            Preference::FastMode => self.fast_mode = value,
            Preference::DarkMode => self.dark_mode = Some(value),
        }
    }
}

/// Cache-over-store for session identity and preference flags
pub struct PreferenceStore<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    state: watch::Sender<PreferenceSnapshot>,
    initialized: AtomicBool,
}

impl<S: KeyValueStore + ?Sized> PreferenceStore<S> {
    /// Create a store over the given backend. Call [`initialize`](Self::initialize)
    /// before reading; until then every value is its default.
    pub fn new(store: Arc<S>) -> Self {
        let (state, _) = watch::channel(PreferenceSnapshot::default());
        Self {
            store,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    /// Load the registered user, the session user, `vibrate` and `fastMode`.
    ///
    /// Never fails: unreadable or malformed keys are logged and fall back to
    /// their defaults. `darkMode` is loaded on first use.
    pub async fn initialize(&self) {
        let registered_user = self.load_user(REGISTERED_USER_KEY).await;
        let logged_in_user = self.load_user(LOGGED_IN_USER_KEY).await;
        let vibrate = self.load_flag(Preference::Vibrate).await;
        let fast_mode = self.load_flag(Preference::FastMode).await;

        self.state.send_modify(|s| {
            s.registered_user = registered_user;
            s.logged_in_user = logged_in_user;
            s.vibrate = vibrate;
            s.fast_mode = fast_mode;
        });
        self.initialized.store(true, Ordering::SeqCst);

        let snapshot = self.snapshot();
        tracing::info!(
            "Preferences loaded (registered: {}, logged in: {})",
            snapshot.registered_user.is_some(),
            snapshot.logged_in_user.is_some()
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Drop cached state back to defaults. Persisted values are untouched and
    /// come back on the next [`initialize`](Self::initialize).
    pub fn shutdown(&self) {
        self.state.send_replace(PreferenceSnapshot::default());
        self.initialized.store(false, Ordering::SeqCst);
        tracing::debug!("Preference store shut down");
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        self.state.borrow().clone()
    }

    /// Observe every committed change
    pub fn subscribe(&self) -> watch::Receiver<PreferenceSnapshot> {
        self.state.subscribe()
    }

    // ========================================================================
    // Session identity
    // ========================================================================

    pub fn registered_user(&self) -> Option<UserRecord> {
        self.state.borrow().registered_user.clone()
    }

    pub async fn set_registered_user(&self, record: UserRecord) -> Result<(), StoreError> {
        self.write_user(REGISTERED_USER_KEY, &record).await?;
        self.state.send_modify(|s| s.registered_user = Some(record));
        Ok(())
    }

    pub fn logged_in_user(&self) -> Option<UserRecord> {
        self.state.borrow().logged_in_user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().logged_in_user.is_some()
    }

    pub async fn set_logged_in_user(&self, record: UserRecord) -> Result<(), StoreError> {
        self.write_user(LOGGED_IN_USER_KEY, &record).await?;
        self.state.send_modify(|s| s.logged_in_user = Some(record));
        Ok(())
    }

    /// End the session. The registered user stays. Succeeds when nobody is logged in.
    pub async fn logout(&self) -> Result<(), StoreError> {
        if let Err(e) = self.store.remove(LOGGED_IN_USER_KEY).await {
            tracing::warn!("Failed to remove {}: {:#}", LOGGED_IN_USER_KEY, e);
            return Err(StoreError::persistence("logout", format!("{:#}", e)));
        }
        self.state.send_modify(|s| s.logged_in_user = None);
        tracing::debug!("Logged out");
        Ok(())
    }

    /// Profile card for whoever is logged in, with placeholder fallbacks
    pub fn current_profile(&self) -> ProfileView {
        ProfileView::from_user(self.state.borrow().logged_in_user.as_ref())
    }

    // ========================================================================
    // Preference flags
    // ========================================================================

    /// Current value of a flag. `darkMode` is read from storage the first time.
    pub async fn flag(&self, pref: Preference) -> bool {
        if pref == Preference::DarkMode && self.state.borrow().dark_mode.is_none() {
            let value = self.load_flag(pref).await;
            // A set_flag that landed while we were reading wins
            self.state.send_if_modified(|s| {
                if s.dark_mode.is_none() {
                    s.dark_mode = Some(value);
                    true
                } else {
                    false
                }
            });
        }
        self.state.borrow().flag(pref)
    }

    pub async fn set_flag(&self, pref: Preference, value: bool) -> Result<(), StoreError> {
        if let Err(e) = self.store.set(pref.key(), Preference::encode(value)).await {
            tracing::warn!("Failed to save {} setting: {:#}", pref, e);
            return Err(StoreError::persistence(pref.key(), format!("{:#}", e)));
        }
        self.state.send_modify(|s| s.set_flag(pref, value));
        tracing::debug!("Set {} = {}", pref, value);
        Ok(())
    }

    /// Read a flag by its public name (`vibrate`, `fastMode`, `darkMode`)
    pub async fn get_preference(&self, name: &str) -> Result<bool, StoreError> {
        let pref = Preference::from_str(name)?;
        Ok(self.flag(pref).await)
    }

    /// Write a flag by its public name. Unknown names change nothing.
    pub async fn set_preference(&self, name: &str, value: bool) -> Result<(), StoreError> {
        let pref = Preference::from_str(name)?;
        self.set_flag(pref, value).await
    }

    // ========================================================================
    // Durable store access
    // ========================================================================

    async fn write_user(&self, key: &str, record: &UserRecord) -> Result<(), StoreError> {
        record.validate()?;
        let json = record.to_json()?;
        if let Err(e) = self.store.set(key, &json).await {
            tracing::warn!("Failed to save {}: {:#}", key, e);
            return Err(StoreError::persistence(key, format!("{:#}", e)));
        }
        Ok(())
    }

    async fn load_user(&self, key: &str) -> Option<UserRecord> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to load {}: {:#}", key, e);
                return None;
            }
        };

        match UserRecord::from_json(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring stored {}: {}", key, e);
                None
            }
        }
    }

    async fn load_flag(&self, pref: Preference) -> bool {
        let raw = match self.store.get(pref.key()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return pref.default_value(),
            Err(e) => {
                tracing::warn!("Failed to load {} setting: {:#}", pref, e);
                return pref.default_value();
            }
        };

        Preference::decode(&raw).unwrap_or_else(|| {
            tracing::warn!("Ignoring malformed {} setting {:?}", pref, raw);
            pref.default_value()
        })
    }
}
