//! # aloha-store
//!
//! Persistence for the geofence collection.
//!
//! The collection is always written whole: [`GeofenceStore::save_all`] replaces
//! every persisted record in one all-or-nothing step, and
//! [`GeofenceStore::load_all`] decodes each record independently so a single
//! corrupt record is skipped instead of failing the load.
//!
//! Two backends are provided:
//! - [`SettingsStore`]: a JSON key/value settings file, the collection stored
//!   as an array under one key. Writes go through a temp file and a rename.
//! - [`MemoryStore`]: in-process, with hooks for seeding raw records and
//!   rejecting writes.

mod codec;
pub mod error;
mod memory;
mod settings;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use settings::SettingsStore;

use aloha_core::Geofence;

/// Result of loading the persisted collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Decoded geofences in persisted order.
    pub geofences: Vec<Geofence>,
    /// Records that could not be decoded (or repeated an identifier) and were dropped.
    pub skipped: usize,
}

/// Whole-collection persistence for geofences.
pub trait GeofenceStore: Send + Sync {
    /// Read every persisted geofence.
    ///
    /// Returns an empty report when nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only when the storage itself is unreadable;
    /// undecodable records are counted in [`LoadReport::skipped`].
    fn load_all(&self) -> Result<LoadReport, StoreError>;

    /// Replace the persisted collection with `geofences`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails. A failed write leaves the
    /// previously persisted collection in place.
    fn save_all(&self, geofences: &[Geofence]) -> Result<(), StoreError>;
}
