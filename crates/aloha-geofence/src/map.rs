//! Map presentation adapter.
//!
//! The map never reads the collection directly. A [`MapPresenter`] listens to
//! [`GeofenceEvent`]s and drives a [`MapSurface`] (the rendering toolkit),
//! keeping an index of what it drew keyed by geofence identifier. Overlays are
//! removed by identifier, never by matching coordinates and radius.

use std::future::Future;

use aloha_core::{Coordinate, Geofence};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::events::GeofenceEvent;

/// Rendering surface for geofence pins and their circles.
pub trait MapSurface: Send {
    /// Add a pin with the geofence's title and subtitle.
    fn add_annotation(&mut self, geofence: &Geofence);

    fn remove_annotation(&mut self, identifier: &str);

    fn add_circle_overlay(&mut self, identifier: &str, center: Coordinate, radius: f64);

    fn remove_circle_overlay(&mut self, identifier: &str);
}

/// Where a lagging presenter gets the current collection from.
pub trait SnapshotSource {
    /// The collection as it is now, or `None` once it is gone.
    fn snapshot(&self) -> impl Future<Output = Option<Vec<Geofence>>> + Send;
}

pub struct MapPresenter<M> {
    surface: M,
    drawn: Vec<String>,
}

impl<M: MapSurface> MapPresenter<M> {
    pub const fn new(surface: M) -> Self {
        Self {
            surface,
            drawn: Vec::new(),
        }
    }

    #[must_use]
    pub const fn surface(&self) -> &M {
        &self.surface
    }

    pub fn into_surface(self) -> M {
        self.surface
    }

    /// Identifiers currently drawn, in drawing order.
    #[must_use]
    pub fn drawn(&self) -> &[String] {
        &self.drawn
    }

    pub fn apply(&mut self, event: &GeofenceEvent) {
        match event {
            GeofenceEvent::Loaded { geofences } => self.redraw(geofences),
            GeofenceEvent::Added { geofence, .. } => self.draw(geofence),
            GeofenceEvent::Removed { geofence } => self.erase(geofence.identifier()),
            GeofenceEvent::AuthorizationChanged(_) | GeofenceEvent::MonitoringFailed { .. } => {}
        }
    }

    /// Replace everything on the surface with `geofences`.
    ///
    /// Also the way to resynchronize after the presenter lagged behind the
    /// event channel: pass a fresh snapshot from the manager.
    pub fn redraw(&mut self, geofences: &[Geofence]) {
        for identifier in std::mem::take(&mut self.drawn) {
            self.surface.remove_circle_overlay(&identifier);
            self.surface.remove_annotation(&identifier);
        }
        for geofence in geofences {
            self.draw(geofence);
        }
    }

    fn draw(&mut self, geofence: &Geofence) {
        if self.is_drawn(geofence.identifier()) {
            self.erase(geofence.identifier());
        }
        self.surface.add_annotation(geofence);
        self.surface.add_circle_overlay(
            geofence.identifier(),
            geofence.center(),
            geofence.radius(),
        );
        self.drawn.push(geofence.identifier().to_string());
    }

    fn erase(&mut self, identifier: &str) {
        if let Some(position) = self.drawn.iter().position(|id| id == identifier) {
            self.drawn.remove(position);
            self.surface.remove_circle_overlay(identifier);
            self.surface.remove_annotation(identifier);
        }
    }

    fn is_drawn(&self, identifier: &str) -> bool {
        self.drawn.iter().any(|id| id == identifier)
    }

    /// Apply events until the channel closes, then hand the presenter back.
    ///
    /// When the receiver lags, the missed events are dropped and the surface
    /// is redrawn from `source`. Events still queued after the snapshot are
    /// applied on top of it; drawing and erasing by identifier are idempotent.
    pub async fn run<R>(mut self, mut events: broadcast::Receiver<GeofenceEvent>, source: R) -> Self
    where
        R: SnapshotSource + Send + Sync,
    {
        loop {
            match events.recv().await {
                Ok(event) => self.apply(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "map presenter lagged behind geofence events; redrawing");
                    if let Some(geofences) = source.snapshot().await {
                        self.redraw(&geofences);
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
        self
    }
}
