use schemars::JsonSchema;
use serde::Serialize;

use crate::entities::Coordinate;
use crate::enums::EventType;
use crate::errors::CoreError;
use crate::ids::{self, PREFIX_GEOFENCE};

/// Title shown for a geofence whose note is empty.
pub const NO_NOTE_TITLE: &str = "No Note";

/// A circular region with a trigger condition, monitored for boundary crossings.
///
/// The identifier is assigned once and never changes; it keys the geofence in
/// the persisted store, in the platform's monitored-region set and on the map.
/// Fields are private so every instance upholds the radius and coordinate
/// invariants checked by the constructors. Decoding goes through
/// [`crate::record::GeofenceRecord`] for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Geofence {
    identifier: String,
    center: Coordinate,
    radius: f64,
    note: String,
    event_type: EventType,
}

impl Geofence {
    /// Create a geofence with a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the radius is not a positive finite
    /// number or the center is outside WGS84 ranges, and `CoreError::Other` if
    /// no identifier could be generated.
    pub fn new(
        center: Coordinate,
        radius: f64,
        note: impl Into<String>,
        event_type: EventType,
    ) -> Result<Self, CoreError> {
        let identifier = ids::generate(PREFIX_GEOFENCE)?;
        Self::with_identifier(identifier, center, radius, note, event_type)
    }

    /// Create a geofence with a caller-supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the identifier is blank or any other
    /// invariant fails (see [`Geofence::new`]).
    pub fn with_identifier(
        identifier: impl Into<String>,
        center: Coordinate,
        radius: f64,
        note: impl Into<String>,
        event_type: EventType,
    ) -> Result<Self, CoreError> {
        let geofence = Self {
            identifier: identifier.into(),
            center,
            radius,
            note: note.into(),
            event_type,
        };
        geofence.validate()?;
        Ok(geofence)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.identifier.trim().is_empty() {
            return Err(CoreError::Validation("identifier must not be empty".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(CoreError::Validation(format!(
                "radius must be a positive number of meters, got {}",
                self.radius
            )));
        }
        if !self.center.is_valid() {
            return Err(CoreError::Validation(format!(
                "center ({}, {}) is outside WGS84 ranges",
                self.center.latitude, self.center.longitude
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub const fn center(&self) -> Coordinate {
        self.center
    }

    /// Radius in meters.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    #[must_use]
    pub const fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Callout title: the note, or a placeholder when the note is empty.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.note.is_empty() {
            NO_NOTE_TITLE
        } else {
            &self.note
        }
    }

    /// Callout subtitle, e.g. `"Radius: 50.0m - On Entry"`.
    ///
    /// The radius always keeps its fractional part, so whole meters render as `50.0`.
    #[must_use]
    pub fn subtitle(&self) -> String {
        format!("Radius: {:?}m - {}", self.radius, self.event_type.label())
    }
}
