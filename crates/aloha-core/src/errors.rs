//! Cross-cutting error types for Aloha.
//!
//! Storage, monitoring and orchestration errors live in their own crates.
//! `aloha-cli` is where they all converge into `anyhow`.

use thiserror::Error;

/// Errors that can be raised while building or decoding a geofence.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A geofence attribute breaks an invariant (radius, coordinates, identifier).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persisted record could not be decoded into a geofence.
    #[error("Corrupt geofence record: {reason}")]
    CorruptRecord { reason: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            reason: reason.into(),
        }
    }
}
