//! Where the geofence collection is persisted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key under which the collection is stored in the settings file.
pub const DEFAULT_COLLECTION_KEY: &str = "savedItems";

fn default_settings_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".aloha").join("settings.json"),
        |dir| dir.join("aloha").join("settings.json"),
    )
}

fn default_collection_key() -> String {
    DEFAULT_COLLECTION_KEY.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// JSON settings file holding the collection (and any other app settings).
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    #[serde(default = "default_collection_key")]
    pub collection_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
            collection_key: default_collection_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = StorageConfig::default();
        assert_eq!(config.collection_key, "savedItems");
        assert!(config.settings_path.ends_with("settings.json"));
    }
}
