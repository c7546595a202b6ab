//! # aloha-geofence
//!
//! The geofence lifecycle manager.
//!
//! [`GeofenceManager`] owns the canonical, insertion-ordered collection and
//! keeps three things in step with it:
//! - the persisted copy (an [`aloha_store::GeofenceStore`]),
//! - the platform's monitored regions (an [`aloha_monitor::MonitoringCoordinator`]),
//! - every subscriber of its [`GeofenceEvent`] channel, typically a
//!   [`MapPresenter`] drawing annotations and overlays.
//!
//! Mutations are serialized on one async mutex. Each one persists the whole
//! next collection first and only commits it in memory once the write
//! succeeded, so the store and the collection never diverge.

pub mod error;
pub mod events;
mod manager;
pub mod map;

pub use error::GeofenceError;
pub use events::GeofenceEvent;
pub use manager::{
    AddReceipt, GeofenceManager, InitializeReport, ManagerOptions, WeakGeofenceManager,
};
pub use map::{MapPresenter, MapSurface, SnapshotSource};
