//! Flat persisted form of a geofence.
//!
//! One record per geofence, stored as a JSON object:
//!
//! ```text
//! {"latitude":40.7,"longitude":-73.9,"radius":50.0,"identifier":"geo-a3f8b2c1",
//!  "note":"","eventType":"OnEntry"}
//! ```
//!
//! `eventType` is kept as a plain string so that a record with an unknown
//! trigger still parses as a record and is rejected during conversion, where it
//! surfaces as `CoreError::CorruptRecord` instead of a generic serde error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinate, Geofence};
use crate::enums::EventType;
use crate::errors::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub identifier: String,
    pub note: String,
    pub event_type: String,
}

impl GeofenceRecord {
    /// Decode one stored JSON value into a geofence.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CorruptRecord` if a field is missing or mistyped,
    /// the event type is unknown, or the values break a geofence invariant.
    pub fn decode(value: serde_json::Value) -> Result<Geofence, CoreError> {
        let record: Self =
            serde_json::from_value(value).map_err(|e| CoreError::corrupt(e.to_string()))?;
        Geofence::try_from(record)
    }

    /// Encode to the stored JSON value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails (non-finite floats).
    pub fn encode(&self) -> Result<serde_json::Value, CoreError> {
        serde_json::to_value(self).map_err(|e| CoreError::Other(e.into()))
    }
}

impl From<&Geofence> for GeofenceRecord {
    fn from(geofence: &Geofence) -> Self {
        let center = geofence.center();
        Self {
            latitude: center.latitude,
            longitude: center.longitude,
            radius: geofence.radius(),
            identifier: geofence.identifier().to_string(),
            note: geofence.note().to_string(),
            event_type: geofence.event_type().as_str().to_string(),
        }
    }
}

impl TryFrom<GeofenceRecord> for Geofence {
    type Error = CoreError;

    fn try_from(record: GeofenceRecord) -> Result<Self, Self::Error> {
        let event_type: EventType = record
            .event_type
            .parse()
            .map_err(|_| CoreError::corrupt(format!("unknown eventType '{}'", record.event_type)))?;

        Self::with_identifier(
            record.identifier,
            Coordinate::new(record.latitude, record.longitude),
            record.radius,
            record.note,
            event_type,
        )
        .map_err(|e| match e {
            CoreError::Validation(reason) => CoreError::corrupt(reason),
            other => other,
        })
    }
}

impl Geofence {
    /// Flatten into the persisted record form.
    #[must_use]
    pub fn to_record(&self) -> GeofenceRecord {
        GeofenceRecord::from(self)
    }
}
