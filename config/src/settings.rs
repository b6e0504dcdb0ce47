//! Application settings management

use crate::{PathManager, DATA_DIR_ENV};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of entries kept in a recent-search list
pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// Which durable store backs preferences and recency lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per key under the data directory
    #[default]
    Fs,
    /// Single SQLite database (requires the `sqlite` feature of dapur-core)
    Sqlite,
    /// Nothing survives the process
    Memory,
}

/// How a recency list treats an entry whose id is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicySetting {
    /// Move the existing entry to the front
    #[default]
    Promote,
    /// Leave the list untouched
    Keep,
}

/// Application settings stored in settings.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Durable store backend
    pub backend: StorageBackend,
    /// Data directory override; falls back to the platform data dir
    pub data_dir: Option<PathBuf>,
    /// Maximum entries in each recent-search list
    pub recent_capacity: usize,
    /// Duplicate handling for recent-search lists
    pub duplicate_policy: DuplicatePolicySetting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: None,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            duplicate_policy: DuplicatePolicySetting::default(),
        }
    }
}

impl Settings {
    /// Load settings from the settings file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = PathManager::settings_path() else {
            return Self::default().with_env_overrides();
        };
        Self::load_from(&path).with_env_overrides()
    }

    /// Load settings from an explicit path. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::parse_file(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and parse a settings file. `Ok(None)` when the file does not exist.
    pub fn parse_file(path: &Path) -> Result<Option<Self>, String> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("Failed to read settings: {}", e)),
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Save settings to the settings file
    pub fn save(&self) -> Result<(), String> {
        let path = PathManager::settings_path().ok_or("Could not determine settings path")?;
        self.save_to(&path)
    }

    /// Save settings to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }

    /// Apply `DAPUR_DATA_DIR` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        self
    }

    /// Capacity with the lower bound of one applied
    pub fn effective_recent_capacity(&self) -> usize {
        self.recent_capacity.max(1)
    }

    /// Data directory to use: the explicit override, else the platform default
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(PathManager::data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let settings: Settings = toml::from_str("backend = \"sqlite\"").unwrap();
        assert_eq!(settings.backend, StorageBackend::Sqlite);
        assert_eq!(settings.recent_capacity, DEFAULT_RECENT_CAPACITY);
        assert_eq!(settings.duplicate_policy, DuplicatePolicySetting::Promote);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("dapur_settings_{}", std::process::id()));
        let path = dir.join("broken.toml");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "recent_capacity = [not toml").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
        let err = Settings::parse_file(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse settings"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_parses_as_none() {
        let path = std::env::temp_dir()
            .join(format!("dapur_settings_none_{}", std::process::id()))
            .join("settings.toml");
        assert_eq!(Settings::parse_file(&path), Ok(None));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("dapur_settings_rt_{}", std::process::id()));
        let path = dir.join("nested").join("settings.toml");

        let settings = Settings {
            backend: StorageBackend::Memory,
            data_dir: Some(PathBuf::from("/tmp/dapur")),
            recent_capacity: 5,
            duplicate_policy: DuplicatePolicySetting::Keep,
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_capacity_lower_bound() {
        let settings = Settings {
            recent_capacity: 0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_recent_capacity(), 1);
    }
}
