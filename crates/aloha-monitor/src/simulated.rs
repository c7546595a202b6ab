//! In-memory location provider.
//!
//! Stands in for the platform on hosts without region monitoring (the CLI) and
//! in tests. It keeps registered regions in insertion order, mimics the
//! platform's region ceiling, and emits [`PlatformEvent`]s the way the real
//! subsystem does: permission changes and late registration failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aloha_core::AuthorizationState;
use tokio::sync::mpsc;

use crate::provider::{LocationProvider, MonitoredRegion, MonitoringError, PlatformEvent};

/// Platform ceiling on simultaneously monitored regions.
pub const DEFAULT_REGION_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    supported: AtomicBool,
    state: Mutex<State>,
    events: mpsc::UnboundedSender<PlatformEvent>,
}

#[derive(Debug)]
struct State {
    authorization: AuthorizationState,
    grant_on_request: AuthorizationState,
    regions: Vec<MonitoredRegion>,
    region_limit: usize,
    rejected: HashMap<String, String>,
}

impl SimulatedProvider {
    /// Create a provider and the receiving end of its event channel.
    #[must_use]
    pub fn new(
        supported: bool,
        authorization: AuthorizationState,
    ) -> (Self, mpsc::UnboundedReceiver<PlatformEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let provider = Self {
            inner: Arc::new(Inner {
                supported: AtomicBool::new(supported),
                state: Mutex::new(State {
                    authorization,
                    grant_on_request: AuthorizationState::AuthorizedAlways,
                    regions: Vec::new(),
                    region_limit: DEFAULT_REGION_LIMIT,
                    rejected: HashMap::new(),
                }),
                events,
            }),
        };
        (provider, receiver)
    }

    pub fn set_supported(&self, supported: bool) {
        self.inner.supported.store(supported, Ordering::SeqCst);
    }

    /// Change permission as if the user edited it in system settings.
    pub fn set_authorization(&self, authorization: AuthorizationState) {
        let changed = {
            let mut state = self.state();
            let changed = state.authorization != authorization;
            state.authorization = authorization;
            changed
        };
        if changed {
            self.emit(PlatformEvent::AuthorizationChanged(authorization));
        }
    }

    /// What the simulated prompt answers on the next authorization request.
    pub fn grant_on_request(&self, authorization: AuthorizationState) {
        self.state().grant_on_request = authorization;
    }

    pub fn set_region_limit(&self, limit: usize) {
        self.state().region_limit = limit;
    }

    /// Make the platform reject registrations for `identifier` with `reason`.
    pub fn reject_registration(&self, identifier: impl Into<String>, reason: impl Into<String>) {
        self.state()
            .rejected
            .insert(identifier.into(), reason.into());
    }

    #[must_use]
    pub fn region(&self, identifier: &str) -> Option<MonitoredRegion> {
        self.state()
            .regions
            .iter()
            .find(|region| region.identifier == identifier)
            .cloned()
    }

    #[must_use]
    pub fn regions(&self) -> Vec<MonitoredRegion> {
        self.state().regions.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: PlatformEvent) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.inner.events.send(event);
    }
}

impl LocationProvider for SimulatedProvider {
    fn is_monitoring_supported(&self) -> bool {
        self.inner.supported.load(Ordering::SeqCst)
    }

    fn authorization_state(&self) -> AuthorizationState {
        self.state().authorization
    }

    fn request_always_authorization(&self) {
        let granted = {
            let mut state = self.state();
            if state.authorization == AuthorizationState::NotDetermined {
                state.authorization = state.grant_on_request;
                Some(state.authorization)
            } else {
                None
            }
        };
        // The platform only prompts once; later requests are silent.
        if let Some(authorization) = granted {
            self.emit(PlatformEvent::AuthorizationChanged(authorization));
        }
    }

    fn start_monitoring(&self, region: MonitoredRegion) {
        let failure = {
            let mut state = self.state();
            if let Some(reason) = state.rejected.get(&region.identifier) {
                Some(MonitoringError::RegistrationFailed(reason.clone()))
            } else if let Some(existing) = state
                .regions
                .iter_mut()
                .find(|existing| existing.identifier == region.identifier)
            {
                *existing = region.clone();
                None
            } else if state.regions.len() >= state.region_limit {
                Some(MonitoringError::RegionLimitReached(state.region_limit))
            } else {
                state.regions.push(region.clone());
                None
            }
        };

        if let Some(error) = failure {
            self.emit(PlatformEvent::MonitoringFailed {
                identifier: region.identifier,
                error,
            });
        }
    }

    fn stop_monitoring(&self, identifier: &str) {
        self.state()
            .regions
            .retain(|region| region.identifier != identifier);
    }

    fn monitored_identifiers(&self) -> Vec<String> {
        self.state()
            .regions
            .iter()
            .map(|region| region.identifier.clone())
            .collect()
    }
}
