//! Change notifications emitted by the manager.

use aloha_core::{AuthorizationState, Geofence};
use aloha_monitor::{MonitoringError, MonitoringStatus};

/// Emitted on the manager's broadcast channel, in mutation order.
#[derive(Debug, Clone, PartialEq)]
pub enum GeofenceEvent {
    /// The collection was (re)loaded from storage; replaces everything drawn.
    Loaded { geofences: Vec<Geofence> },
    Added {
        geofence: Geofence,
        status: MonitoringStatus,
    },
    Removed { geofence: Geofence },
    AuthorizationChanged(AuthorizationState),
    /// The platform rejected the region of a geofence in the collection.
    MonitoringFailed {
        identifier: String,
        error: MonitoringError,
    },
}
