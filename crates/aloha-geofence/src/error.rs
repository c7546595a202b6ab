//! Manager error types.

use aloha_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeofenceError {
    /// The collection already holds the maximum number of geofences.
    #[error("cannot add geofence: the limit of {limit} geofences has been reached")]
    CapacityExceeded { limit: usize },

    #[error("a geofence with identifier '{0}' already exists")]
    DuplicateIdentifier(String),

    #[error("no geofence with identifier '{0}'")]
    NotFound(String),

    /// Saving the collection failed; the in-memory change was not applied.
    #[error("failed to persist geofences: {0}")]
    PersistenceWrite(#[source] StoreError),

    #[error("failed to load geofences: {0}")]
    PersistenceRead(#[source] StoreError),

    /// The blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    StorageTask(#[from] tokio::task::JoinError),
}
