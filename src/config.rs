//! Store Configuration
//!
//! Read from a JSON file (camelCase keys). Every field has a default, so a
//! partial file is fine and a missing or malformed one yields the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Revert records whose reorder write failed
    pub rollback_on_failure: bool,
    /// How long loaded analytics stay fresh
    pub analytics_ttl_secs: u64,
    /// Auto-dismiss delay for success/info/warning toasts
    pub toast_ms: u64,
    /// Auto-dismiss delay for error toasts
    pub error_toast_ms: u64,
    /// Toast when a card lands in another list
    pub announce_moves: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rollback_on_failure: true,
            analytics_ttl_secs: 300,
            toast_ms: 3000,
            error_toast_ms: 5000,
            announce_moves: true,
        }
    }
}

/// Load config from path. Returns defaults if the file is missing or invalid.
pub fn load_config(path: &Path) -> StoreConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            StoreConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            StoreConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{ "rollbackOnFailure": false, "toastMs": 1500 }"#).unwrap();

        let config = load_config(&path);
        assert!(!config.rollback_on_failure);
        assert_eq!(config.toast_ms, 1500);
        assert_eq!(config.error_toast_ms, 5000);
        assert_eq!(config.analytics_ttl_secs, 300);
    }

    #[test]
    fn test_missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(&dir.path().join("absent.json")), StoreConfig::default());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(&path), StoreConfig::default());
    }
}
