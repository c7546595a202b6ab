//! Headless map surface.
//!
//! The CLI has no map to draw on, so pins and circles are reported through
//! `tracing` at debug level (`--verbose` or `ALOHA_LOG=debug`).

use aloha_core::{Coordinate, Geofence};
use aloha_geofence::MapSurface;

#[derive(Debug, Default)]
pub struct TracingSurface {
    pins: usize,
    circles: usize,
}

impl TracingSurface {
    /// Pins and circles currently on the surface.
    pub const fn counts(&self) -> (usize, usize) {
        (self.pins, self.circles)
    }
}

impl MapSurface for TracingSurface {
    fn add_annotation(&mut self, geofence: &Geofence) {
        self.pins += 1;
        tracing::debug!(
            identifier = geofence.identifier(),
            title = geofence.title(),
            subtitle = %geofence.subtitle(),
            "map: pin added"
        );
    }

    fn remove_annotation(&mut self, identifier: &str) {
        self.pins = self.pins.saturating_sub(1);
        tracing::debug!(identifier, "map: pin removed");
    }

    fn add_circle_overlay(&mut self, identifier: &str, center: Coordinate, radius: f64) {
        self.circles += 1;
        tracing::debug!(
            identifier,
            latitude = center.latitude,
            longitude = center.longitude,
            radius,
            "map: circle added"
        );
    }

    fn remove_circle_overlay(&mut self, identifier: &str) {
        self.circles = self.circles.saturating_sub(1);
        tracing::debug!(identifier, "map: circle removed");
    }
}

#[cfg(test)]
mod tests {
    use aloha_core::{EventType, Geofence};
    use aloha_geofence::{GeofenceEvent, MapPresenter};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn presenter_keeps_pins_and_circles_paired() {
        let geofence = Geofence::with_identifier(
            "geo-0000000a",
            Coordinate::new(10.0, 20.0),
            75.0,
            "hi",
            EventType::OnExit,
        )
        .expect("valid geofence");

        let mut presenter = MapPresenter::new(TracingSurface::default());
        presenter.apply(&GeofenceEvent::Loaded {
            geofences: vec![geofence.clone()],
        });
        assert_eq!(presenter.surface().counts(), (1, 1));

        presenter.apply(&GeofenceEvent::Removed { geofence });
        assert_eq!(presenter.surface().counts(), (0, 0));
    }
}
