pub mod paths;
pub mod settings;

pub use paths::PathManager;
pub use settings::{DuplicatePolicySetting, Settings, StorageBackend};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "DAPUR_DATA_DIR";

/// Load environment variables from .env files.
/// First loads from ~/.env (home directory), then from ./.env (project directory).
/// Project directory values take precedence over home directory values.
/// Call this before parsing CLI args to ensure env vars are available.
pub fn load_env_file() {
    // Load from home directory first (lower precedence)
    if let Some(home) = dirs::home_dir() {
        let home_env_path = home.join(".env");
        dotenv::from_path(home_env_path).ok();
    }

    // Project directory values overwrite home values
    dotenv::dotenv().ok();
}
