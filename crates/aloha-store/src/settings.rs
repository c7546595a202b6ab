//! JSON key/value settings file backend.
//!
//! The file is a single JSON object. The collection lives under one key as an
//! array of records; every other key is left untouched:
//!
//! ```text
//! {
//!   "savedItems": [ {"latitude": ..., "eventType": "OnEntry"}, ... ],
//!   "someOtherSetting": true
//! }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use aloha_core::Geofence;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::codec::{decode_records, encode_records};
use crate::error::StoreError;
use crate::{GeofenceStore, LoadReport};

pub struct SettingsStore {
    path: PathBuf,
    key: String,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// The settings file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the settings object, or an empty one if the file does not exist.
    fn read_settings(&self) -> Result<Map<String, Value>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(error.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(self.malformed("top-level value is not an object")),
            Err(error) => Err(self.malformed(error.to_string())),
        }
    }

    /// Write the settings object to a sibling temp file, then rename it over
    /// the target.
    fn write_settings(&self, settings: &Map<String, Value>) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, settings)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }

    fn malformed(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Malformed {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl GeofenceStore for SettingsStore {
    fn load_all(&self) -> Result<LoadReport, StoreError> {
        let mut settings = self.read_settings()?;
        let records = match settings.remove(&self.key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(records)) => records,
            Some(_) => {
                return Err(self.malformed(format!("'{}' is not an array", self.key)));
            }
        };

        let report = decode_records(records);
        tracing::debug!(
            path = %self.path.display(),
            loaded = report.geofences.len(),
            skipped = report.skipped,
            "loaded geofence collection"
        );
        Ok(report)
    }

    fn save_all(&self, geofences: &[Geofence]) -> Result<(), StoreError> {
        let records = encode_records(geofences)?;
        let mut settings = self.read_settings()?;
        if matches!(settings.get(&self.key), Some(existing) if !existing.is_array() && !existing.is_null())
        {
            return Err(self.malformed(format!("'{}' is not an array", self.key)));
        }
        settings.insert(self.key.clone(), Value::Array(records));
        self.write_settings(&settings)?;

        tracing::debug!(
            path = %self.path.display(),
            count = geofences.len(),
            "saved geofence collection"
        );
        Ok(())
    }
}
