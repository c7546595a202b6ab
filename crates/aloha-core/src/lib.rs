//! # aloha-core
//!
//! Core types shared by every Aloha crate:
//! - The [`Geofence`](entities::Geofence) entity and its presentation projections
//! - [`EventType`](enums::EventType), the boundary-crossing trigger, and the
//!   platform [`AuthorizationState`](enums::AuthorizationState)
//! - Identifier generation
//! - The flat persisted [`GeofenceRecord`](record::GeofenceRecord) and its codec
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod record;

pub use entities::{Coordinate, Geofence};
pub use enums::{AuthorizationState, EventType};
pub use errors::CoreError;
pub use record::GeofenceRecord;
