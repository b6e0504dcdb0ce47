//! Shared utilities for storage implementations

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current unix timestamp in milliseconds
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// File name for a storage key.
///
/// Keys like `@last_searches` are not safe path components on every platform,
/// so the file name is the hex encoding of the key bytes.
pub fn key_file_name(key: &str) -> String {
    hex::encode(key.as_bytes())
}

/// Inverse of [`key_file_name`]. Returns None for names that are not valid hex/UTF-8.
pub fn key_from_file_name(name: &str) -> Option<String> {
    let bytes = hex::decode(name).ok()?;
    String::from_utf8(bytes).ok()
}
