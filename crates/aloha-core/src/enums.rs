//! Trigger and permission enums.
//!
//! `EventType` is stored as its variant name (`"OnEntry"` / `"OnExit"`) and
//! rendered to users with a spaced label (`"On Entry"` / `"On Exit"`).
//! `AuthorizationState` uses `snake_case`, matching config files.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Which boundary crossing fires a notification. Exactly one per geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EventType {
    OnEntry,
    OnExit,
}

impl EventType {
    pub const ALL: [Self; 2] = [Self::OnEntry, Self::OnExit];

    /// Return the string representation used in persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnEntry => "OnEntry",
            Self::OnExit => "OnExit",
        }
    }

    /// Human label shown in map callouts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnEntry => "On Entry",
            Self::OnExit => "On Exit",
        }
    }

    /// Region notification flags as `(notify_on_entry, notify_on_exit)`.
    #[must_use]
    pub const fn notify_flags(self) -> (bool, bool) {
        match self {
            Self::OnEntry => (true, false),
            Self::OnExit => (false, true),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown event type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// AuthorizationState
// ---------------------------------------------------------------------------

/// Location permission granted to the app by the platform.
///
/// Region monitoring only fires with `AuthorizedAlways`; any other state still
/// lets regions be registered, and they activate once full permission arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    NotDetermined,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
}

impl AuthorizationState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotDetermined => "not_determined",
            Self::Denied => "denied",
            Self::AuthorizedAlways => "authorized_always",
            Self::AuthorizedWhenInUse => "authorized_when_in_use",
        }
    }

    /// Whether monitored regions will actually deliver crossings.
    #[must_use]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::AuthorizedAlways)
    }
}

impl fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
