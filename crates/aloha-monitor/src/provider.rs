//! Platform boundary for region monitoring.

use std::sync::Arc;

use aloha_core::{AuthorizationState, Coordinate, Geofence};
use serde::Serialize;
use thiserror::Error;

/// A circular region as registered with the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredRegion {
    pub identifier: String,
    pub center: Coordinate,
    pub radius: f64,
    pub notify_on_entry: bool,
    pub notify_on_exit: bool,
}

impl MonitoredRegion {
    /// Region for a geofence; exactly one notify flag is set, from its event type.
    #[must_use]
    pub fn for_geofence(geofence: &Geofence) -> Self {
        let (notify_on_entry, notify_on_exit) = geofence.event_type().notify_flags();
        Self {
            identifier: geofence.identifier().to_string(),
            center: geofence.center(),
            radius: geofence.radius(),
            notify_on_entry,
            notify_on_exit,
        }
    }
}

/// Registration failure reported by the platform after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MonitoringError {
    #[error("region registration failed: {0}")]
    RegistrationFailed(String),

    #[error("platform limit of {0} monitored regions reached")]
    RegionLimitReached(usize),
}

/// Asynchronous notifications from the location subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    AuthorizationChanged(AuthorizationState),
    MonitoringFailed {
        identifier: String,
        error: MonitoringError,
    },
}

/// The platform's region-monitoring capability.
///
/// Calls return immediately. Anything the platform decides later (a prompt
/// answered, a registration rejected) is delivered as a [`PlatformEvent`].
pub trait LocationProvider: Send + Sync {
    fn is_monitoring_supported(&self) -> bool;

    fn authorization_state(&self) -> AuthorizationState;

    /// Ask for "always" permission. The outcome arrives as
    /// [`PlatformEvent::AuthorizationChanged`].
    fn request_always_authorization(&self);

    /// Register (or replace) the region with the same identifier.
    fn start_monitoring(&self, region: MonitoredRegion);

    fn stop_monitoring(&self, identifier: &str);

    /// Identifiers of every region currently registered.
    fn monitored_identifiers(&self) -> Vec<String>;
}

impl<T: LocationProvider + ?Sized> LocationProvider for Arc<T> {
    fn is_monitoring_supported(&self) -> bool {
        (**self).is_monitoring_supported()
    }

    fn authorization_state(&self) -> AuthorizationState {
        (**self).authorization_state()
    }

    fn request_always_authorization(&self) {
        (**self).request_always_authorization();
    }

    fn start_monitoring(&self, region: MonitoredRegion) {
        (**self).start_monitoring(region);
    }

    fn stop_monitoring(&self, identifier: &str) {
        (**self).stop_monitoring(identifier);
    }

    fn monitored_identifiers(&self) -> Vec<String> {
        (**self).monitored_identifiers()
    }
}
