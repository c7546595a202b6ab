//! Geofence-level monitoring on top of a [`LocationProvider`].

use aloha_core::{AuthorizationState, Geofence};
use serde::Serialize;
use thiserror::Error;

use crate::provider::{LocationProvider, MonitoredRegion};

/// What happened when a geofence was handed to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "authorization", rename_all = "snake_case")]
pub enum MonitoringStatus {
    /// Registered with full permission.
    Armed,
    /// Registered, but it only fires once "always" permission is granted.
    PendingAuthorization(AuthorizationState),
    /// The device cannot monitor regions; nothing was registered.
    Unsupported,
}

impl MonitoringStatus {
    /// The user-facing warning for this outcome, if any.
    #[must_use]
    pub const fn warning(self) -> Option<MonitoringWarning> {
        match self {
            Self::Armed => None,
            Self::PendingAuthorization(state) => {
                Some(MonitoringWarning::PartialAuthorization { state })
            }
            Self::Unsupported => Some(MonitoringWarning::MonitoringUnsupported),
        }
    }

    #[must_use]
    pub const fn is_registered(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Non-fatal problems to surface after a geofence was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonitoringWarning {
    #[error("geofencing is not supported on this device; the geofence is saved but cannot be armed")]
    MonitoringUnsupported,

    #[error(
        "the geofence is saved but only activates once location access is set to always (currently {state})"
    )]
    PartialAuthorization { state: AuthorizationState },
}

/// Registers and deregisters geofences with the platform.
pub struct MonitoringCoordinator<P> {
    provider: P,
}

impl<P: LocationProvider> MonitoringCoordinator<P> {
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn is_monitoring_supported(&self) -> bool {
        self.provider.is_monitoring_supported()
    }

    #[must_use]
    pub fn authorization_state(&self) -> AuthorizationState {
        self.provider.authorization_state()
    }

    /// Ask for "always" permission; watch for `AuthorizationChanged`.
    pub fn request_always_authorization(&self) {
        tracing::debug!("requesting always authorization");
        self.provider.request_always_authorization();
    }

    /// Register a region for `geofence`, keyed by its identifier.
    pub fn start_monitoring(&self, geofence: &Geofence) -> MonitoringStatus {
        if !self.provider.is_monitoring_supported() {
            tracing::warn!(
                identifier = geofence.identifier(),
                "region monitoring unsupported; geofence not armed"
            );
            return MonitoringStatus::Unsupported;
        }

        let region = MonitoredRegion::for_geofence(geofence);
        tracing::debug!(
            identifier = %region.identifier,
            radius = region.radius,
            notify_on_entry = region.notify_on_entry,
            notify_on_exit = region.notify_on_exit,
            "starting region monitoring"
        );
        self.provider.start_monitoring(region);

        let state = self.provider.authorization_state();
        if state.is_full() {
            MonitoringStatus::Armed
        } else {
            tracing::warn!(
                identifier = geofence.identifier(),
                authorization = %state,
                "region registered without always authorization"
            );
            MonitoringStatus::PendingAuthorization(state)
        }
    }

    /// Deregister the region for `identifier`. Returns whether one was registered.
    pub fn stop_monitoring(&self, identifier: &str) -> bool {
        let registered = self
            .provider
            .monitored_identifiers()
            .iter()
            .any(|id| id == identifier);
        if registered {
            tracing::debug!(identifier, "stopping region monitoring");
            self.provider.stop_monitoring(identifier);
        }
        registered
    }
}

#[cfg(test)]
mod tests {
    use aloha_core::{Coordinate, EventType};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::simulated::SimulatedProvider;

    fn geofence(id: &str, event_type: EventType) -> Geofence {
        Geofence::with_identifier(id, Coordinate::new(40.7, -73.9), 50.0, "", event_type).unwrap()
    }

    #[rstest]
    #[case(EventType::OnEntry, true, false)]
    #[case(EventType::OnExit, false, true)]
    fn region_flags_follow_event_type(
        #[case] event_type: EventType,
        #[case] entry: bool,
        #[case] exit: bool,
    ) {
        let (provider, _events) = SimulatedProvider::new(true, AuthorizationState::AuthorizedAlways);
        let coordinator = MonitoringCoordinator::new(provider.clone());

        coordinator.start_monitoring(&geofence("A", event_type));

        let region = provider.region("A").expect("region registered");
        assert_eq!(region.notify_on_entry, entry);
        assert_eq!(region.notify_on_exit, exit);
        assert_eq!(region.radius, 50.0);
    }

    #[test]
    fn full_authorization_arms() {
        let (provider, _events) = SimulatedProvider::new(true, AuthorizationState::AuthorizedAlways);
        let coordinator = MonitoringCoordinator::new(provider);
        let status = coordinator.start_monitoring(&geofence("A", EventType::OnEntry));
        assert_eq!(status, MonitoringStatus::Armed);
        assert_eq!(status.warning(), None);
        assert!(status.is_registered());
        assert_eq!(coordinator.provider().monitored_identifiers(), vec!["A"]);
    }

    #[rstest]
    #[case(AuthorizationState::AuthorizedWhenInUse)]
    #[case(AuthorizationState::NotDetermined)]
    #[case(AuthorizationState::Denied)]
    fn partial_authorization_registers_and_warns(#[case] state: AuthorizationState) {
        let (provider, _events) = SimulatedProvider::new(true, state);
        let coordinator = MonitoringCoordinator::new(provider.clone());

        let status = coordinator.start_monitoring(&geofence("A", EventType::OnExit));

        assert_eq!(status, MonitoringStatus::PendingAuthorization(state));
        assert_eq!(
            status.warning(),
            Some(MonitoringWarning::PartialAuthorization { state })
        );
        assert!(provider.region("A").is_some());
    }

    #[test]
    fn unsupported_registers_nothing() {
        let (provider, _events) = SimulatedProvider::new(false, AuthorizationState::AuthorizedAlways);
        let coordinator = MonitoringCoordinator::new(provider.clone());

        let status = coordinator.start_monitoring(&geofence("A", EventType::OnEntry));

        assert_eq!(status, MonitoringStatus::Unsupported);
        assert!(!status.is_registered());
        assert_eq!(status.warning(), Some(MonitoringWarning::MonitoringUnsupported));
        assert!(provider.monitored_identifiers().is_empty());
    }

    #[test]
    fn stop_is_idempotent() {
        let (provider, _events) = SimulatedProvider::new(true, AuthorizationState::AuthorizedAlways);
        let coordinator = MonitoringCoordinator::new(provider.clone());
        coordinator.start_monitoring(&geofence("A", EventType::OnEntry));

        assert!(coordinator.stop_monitoring("A"));
        assert!(!coordinator.stop_monitoring("A"));
        assert!(!coordinator.stop_monitoring("never-registered"));
        assert!(provider.monitored_identifiers().is_empty());
    }

    #[test]
    fn restarting_same_identifier_replaces_region() {
        let (provider, _events) = SimulatedProvider::new(true, AuthorizationState::AuthorizedAlways);
        let coordinator = MonitoringCoordinator::new(provider.clone());
        coordinator.start_monitoring(&geofence("A", EventType::OnEntry));
        coordinator.start_monitoring(&geofence("A", EventType::OnExit));

        assert_eq!(provider.monitored_identifiers(), vec!["A".to_string()]);
        assert!(provider.region("A").unwrap().notify_on_exit);
    }
}
