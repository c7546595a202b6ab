//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings file exists but does not have the expected shape.
    #[error("malformed settings file '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// A geofence could not be encoded into its record form.
    #[error("failed to encode geofence: {0}")]
    Encode(#[from] aloha_core::CoreError),

    /// The atomic rename of the freshly written settings file failed.
    #[error("failed to replace settings file '{path}': {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backend refused the write (memory store failure injection).
    #[error("write rejected: {0}")]
    WriteRejected(String),
}
