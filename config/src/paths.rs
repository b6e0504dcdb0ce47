use directories::BaseDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

const APP_DIR: &str = "dapur";

pub struct PathManager;

impl PathManager {
    /// Set a custom data directory (useful for Android/iOS where standard detection fails).
    ///
    /// Only the first call takes effect; returns false if an override was already set.
    pub fn set_data_dir(path: PathBuf) -> bool {
        DATA_DIR_OVERRIDE.set(path).is_ok()
    }

    fn base_data_dir() -> Option<PathBuf> {
        if let Some(d) = DATA_DIR_OVERRIDE.get() {
            return Some(d.clone());
        }
        BaseDirs::new().map(|d| d.data_dir().join(APP_DIR))
    }

    pub fn data_dir() -> Option<PathBuf> {
        Self::base_data_dir()
    }

    pub fn config_dir() -> Option<PathBuf> {
        // Mobile targets keep everything under the data dir
        #[cfg(any(target_os = "android", target_os = "ios"))]
        return Self::data_dir();

        #[cfg(not(any(target_os = "android", target_os = "ios")))]
        {
            if let Some(d) = DATA_DIR_OVERRIDE.get() {
                return Some(d.clone());
            }
            BaseDirs::new().map(|d| d.config_dir().join(APP_DIR))
        }
    }

    /// Directory holding one file per key for the filesystem store
    pub fn store_dir() -> Option<PathBuf> {
        Self::data_dir().map(|d| d.join("store"))
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::data_dir().map(|d| d.join("dapur.db"))
    }

    pub fn logs_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if DATA_DIR_OVERRIDE.get().is_none() {
                if let Some(dirs) = directories::UserDirs::new() {
                    return Some(dirs.home_dir().join("Library/Logs/Dapur"));
                }
            }
        }
        Self::data_dir().map(|d| d.join("logs"))
    }

    pub fn log_file_path() -> Option<PathBuf> {
        Self::logs_dir().map(|d| d.join("dapur.log"))
    }

    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.toml"))
    }

    pub fn ensure_dirs_exist() -> std::io::Result<()> {
        if let Some(d) = Self::data_dir() {
            std::fs::create_dir_all(&d)?;
        }
        if let Some(d) = Self::config_dir() {
            std::fs::create_dir_all(&d)?;
        }
        if let Some(d) = Self::store_dir() {
            std::fs::create_dir_all(&d)?;
        }
        Ok(())
    }
}
