//! Entity structs for Aloha domain objects.
//!
//! All structs derive `Serialize` and `JsonSchema` so hosts can emit them as
//! JSON. The persisted layout is [`crate::record::GeofenceRecord`],
//! not these structs.

mod coordinate;
mod geofence;

pub use coordinate::Coordinate;
pub use geofence::{Geofence, NO_NOTE_TITLE};
