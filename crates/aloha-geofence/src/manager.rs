use std::future::Future;
use std::sync::{Arc, Weak};

use aloha_config::AlohaConfig;
use aloha_core::{AuthorizationState, Geofence};
use aloha_monitor::{
    LocationProvider, MonitoringCoordinator, MonitoringStatus, MonitoringWarning, PlatformEvent,
};
use aloha_store::{GeofenceStore, LoadReport};
use serde::Serialize;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::error::GeofenceError;
use crate::events::GeofenceEvent;
use crate::map::SnapshotSource;

const DEFAULT_MAX_GEOFENCES: usize = 20;
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Ceiling enforced by `add`; loading never drops entries over it.
    pub max_geofences: usize,
    pub channel_capacity: usize,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            max_geofences: DEFAULT_MAX_GEOFENCES,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl From<&AlohaConfig> for ManagerOptions {
    fn from(config: &AlohaConfig) -> Self {
        Self {
            max_geofences: config.monitoring.max_geofences,
            channel_capacity: config.events.channel_capacity,
        }
    }
}

/// Result of a successful `add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddReceipt {
    pub geofence: Geofence,
    pub monitoring: MonitoringStatus,
}

impl AddReceipt {
    /// Warning to show the user; the geofence is saved either way.
    #[must_use]
    pub const fn warning(&self) -> Option<MonitoringWarning> {
        self.monitoring.warning()
    }
}

/// Result of `initialize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitializeReport {
    pub loaded: usize,
    pub skipped: usize,
    /// Geofences loaded but not fully armed, with the reason.
    pub warnings: Vec<(String, MonitoringWarning)>,
}

/// Owns the geofence collection and reconciles storage, monitoring and
/// subscribers with it.
///
/// Cloning yields another handle to the same manager.
pub struct GeofenceManager<S, P> {
    shared: Arc<Shared<S, P>>,
}

impl<S, P> Clone for GeofenceManager<S, P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Handle that does not keep the manager alive.
///
/// Subscribers hold this instead of a [`GeofenceManager`] so that dropping the
/// last manager still closes the event channel.
pub struct WeakGeofenceManager<S, P> {
    shared: Weak<Shared<S, P>>,
}

impl<S, P> Clone for WeakGeofenceManager<S, P> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S, P> WeakGeofenceManager<S, P> {
    #[must_use]
    pub fn upgrade(&self) -> Option<GeofenceManager<S, P>> {
        self.shared
            .upgrade()
            .map(|shared| GeofenceManager { shared })
    }
}

impl<S, P> SnapshotSource for WeakGeofenceManager<S, P>
where
    S: GeofenceStore + 'static,
    P: LocationProvider + 'static,
{
    fn snapshot(&self) -> impl Future<Output = Option<Vec<Geofence>>> + Send {
        let manager = self.upgrade();
        async move {
            match manager {
                Some(manager) => Some(manager.all().await),
                None => None,
            }
        }
    }
}

struct Shared<S, P> {
    store: Arc<S>,
    coordinator: MonitoringCoordinator<P>,
    state: Mutex<State>,
    events: broadcast::Sender<GeofenceEvent>,
    max_geofences: usize,
}

struct State {
    geofences: Vec<Geofence>,
    authorization: AuthorizationState,
}

impl<S, P> GeofenceManager<S, P>
where
    S: GeofenceStore + 'static,
    P: LocationProvider + 'static,
{
    /// Create a manager with an empty collection. Call
    /// [`initialize`](Self::initialize) to load what was persisted.
    #[must_use]
    pub fn new(store: S, provider: P, options: ManagerOptions) -> Self {
        let coordinator = MonitoringCoordinator::new(provider);
        let authorization = coordinator.authorization_state();
        let (events, _) = broadcast::channel(options.channel_capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                store: Arc::new(store),
                coordinator,
                state: Mutex::new(State {
                    geofences: Vec::new(),
                    authorization,
                }),
                events,
                max_geofences: options.max_geofences,
            }),
        }
    }

    /// Receive every event emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GeofenceEvent> {
        self.shared.events.subscribe()
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakGeofenceManager<S, P> {
        WeakGeofenceManager {
            shared: Arc::downgrade(&self.shared),
        }
    }

    #[must_use]
    pub fn coordinator(&self) -> &MonitoringCoordinator<P> {
        &self.shared.coordinator
    }

    /// Load the persisted collection and re-arm every geofence in it.
    ///
    /// Region registrations do not survive a restart, so every loaded entry is
    /// registered again. Entries over the `add` ceiling are kept. Regions of
    /// geofences that were in memory but are no longer persisted are stopped.
    /// If permission was never asked for, "always" permission is requested.
    ///
    /// # Errors
    ///
    /// Returns `GeofenceError::PersistenceRead` if the store is unreadable.
    /// Corrupt records are skipped and counted, not returned as errors.
    pub async fn initialize(&self) -> Result<InitializeReport, GeofenceError> {
        let mut state = self.shared.state.lock().await;
        let coordinator = &self.shared.coordinator;

        let loaded = self.load().await?;

        if loaded.geofences.len() > self.shared.max_geofences {
            tracing::warn!(
                count = loaded.geofences.len(),
                limit = self.shared.max_geofences,
                "persisted collection exceeds the geofence limit; keeping all entries"
            );
        }

        for stale in state
            .geofences
            .iter()
            .filter(|old| !loaded.geofences.iter().any(|g| g.identifier() == old.identifier()))
        {
            coordinator.stop_monitoring(stale.identifier());
        }

        if coordinator.authorization_state() == AuthorizationState::NotDetermined {
            coordinator.request_always_authorization();
        }

        let mut report = InitializeReport {
            loaded: loaded.geofences.len(),
            skipped: loaded.skipped,
            warnings: Vec::new(),
        };
        for geofence in &loaded.geofences {
            if let Some(warning) = coordinator.start_monitoring(geofence).warning() {
                report
                    .warnings
                    .push((geofence.identifier().to_string(), warning));
            }
        }

        state.geofences = loaded.geofences;
        state.authorization = coordinator.authorization_state();
        self.emit(GeofenceEvent::Loaded {
            geofences: state.geofences.clone(),
        });

        tracing::info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "geofence collection initialized"
        );
        Ok(report)
    }

    /// Append a geofence, persist the collection and start monitoring it.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if the collection is already at the limit.
    /// - `DuplicateIdentifier` if the identifier is already in use.
    /// - `PersistenceWrite` if saving fails; the collection is left unchanged.
    ///
    /// Monitoring problems are not errors; see [`AddReceipt::warning`].
    pub async fn add(&self, geofence: Geofence) -> Result<AddReceipt, GeofenceError> {
        let mut state = self.shared.state.lock().await;

        if state.geofences.len() >= self.shared.max_geofences {
            return Err(GeofenceError::CapacityExceeded {
                limit: self.shared.max_geofences,
            });
        }
        if state
            .geofences
            .iter()
            .any(|existing| existing.identifier() == geofence.identifier())
        {
            return Err(GeofenceError::DuplicateIdentifier(
                geofence.identifier().to_string(),
            ));
        }

        let mut next = state.geofences.clone();
        next.push(geofence.clone());
        state.geofences = self.save(next).await?;

        let monitoring = self.shared.coordinator.start_monitoring(&geofence);
        tracing::info!(
            identifier = geofence.identifier(),
            event_type = %geofence.event_type(),
            radius = geofence.radius(),
            "geofence added"
        );
        self.emit(GeofenceEvent::Added {
            geofence: geofence.clone(),
            status: monitoring,
        });

        Ok(AddReceipt {
            geofence,
            monitoring,
        })
    }

    /// Remove a geofence, persist the collection and stop monitoring it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no geofence has this identifier; nothing changes.
    /// - `PersistenceWrite` if saving fails; the collection is left unchanged.
    pub async fn remove(&self, identifier: &str) -> Result<Geofence, GeofenceError> {
        let mut state = self.shared.state.lock().await;

        let position = state
            .geofences
            .iter()
            .position(|geofence| geofence.identifier() == identifier)
            .ok_or_else(|| GeofenceError::NotFound(identifier.to_string()))?;

        let mut next = state.geofences.clone();
        let removed = next.remove(position);
        state.geofences = self.save(next).await?;

        self.shared.coordinator.stop_monitoring(identifier);
        tracing::info!(identifier, "geofence removed");
        self.emit(GeofenceEvent::Removed {
            geofence: removed.clone(),
        });

        Ok(removed)
    }

    pub async fn count(&self) -> usize {
        self.shared.state.lock().await.geofences.len()
    }

    /// Snapshot of the collection in insertion order.
    pub async fn all(&self) -> Vec<Geofence> {
        self.shared.state.lock().await.geofences.clone()
    }

    pub async fn get(&self, identifier: &str) -> Option<Geofence> {
        self.shared
            .state
            .lock()
            .await
            .geofences
            .iter()
            .find(|geofence| geofence.identifier() == identifier)
            .cloned()
    }

    /// Last authorization state seen from the platform.
    pub async fn authorization_state(&self) -> AuthorizationState {
        self.shared.state.lock().await.authorization
    }

    /// Apply one platform notification under the mutation lock.
    pub async fn apply_platform_event(&self, event: PlatformEvent) {
        let mut state = self.shared.state.lock().await;
        match event {
            PlatformEvent::AuthorizationChanged(authorization) => {
                if state.authorization == authorization {
                    return;
                }
                tracing::info!(
                    from = %state.authorization,
                    to = %authorization,
                    "location authorization changed"
                );
                state.authorization = authorization;
                self.emit(GeofenceEvent::AuthorizationChanged(authorization));
            }
            PlatformEvent::MonitoringFailed { identifier, error } => {
                if state
                    .geofences
                    .iter()
                    .any(|geofence| geofence.identifier() == identifier)
                {
                    tracing::warn!(%identifier, %error, "region monitoring failed");
                    self.emit(GeofenceEvent::MonitoringFailed { identifier, error });
                } else {
                    tracing::debug!(%identifier, %error, "ignoring failure for unknown region");
                }
            }
        }
    }

    /// Spawn a task feeding platform events into
    /// [`apply_platform_event`](Self::apply_platform_event) until the sender
    /// side closes.
    pub fn attach_platform_events(
        &self,
        mut events: mpsc::UnboundedReceiver<PlatformEvent>,
    ) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                manager.apply_platform_event(event).await;
            }
            tracing::debug!("platform event channel closed");
        })
    }

    /// Read the store on the blocking pool.
    async fn load(&self) -> Result<LoadReport, GeofenceError> {
        let store = Arc::clone(&self.shared.store);
        tokio::task::spawn_blocking(move || store.load_all())
            .await?
            .map_err(GeofenceError::PersistenceRead)
    }

    /// Persist `next` on the blocking pool and hand it back once it is durable.
    async fn save(&self, next: Vec<Geofence>) -> Result<Vec<Geofence>, GeofenceError> {
        let store = Arc::clone(&self.shared.store);
        tokio::task::spawn_blocking(move || store.save_all(&next).map(|()| next))
            .await?
            .map_err(GeofenceError::PersistenceWrite)
    }

    fn emit(&self, event: GeofenceEvent) {
        // No subscribers is fine; events are only notifications.
        let _ = self.shared.events.send(event);
    }
}
