//! # aloha-monitor
//!
//! Wraps the platform's circular-region monitoring.
//!
//! - [`LocationProvider`] is the platform boundary. Hosts implement it over the
//!   real location subsystem; [`SimulatedProvider`] is an in-memory one.
//! - [`MonitoringCoordinator`] turns geofences into regions and reports
//!   capability and permission problems as [`MonitoringStatus`] values instead
//!   of errors.
//! - Failures the platform resolves later arrive as [`PlatformEvent`]s on a
//!   channel owned by the provider.

mod coordinator;
pub mod provider;
mod simulated;

pub use coordinator::{MonitoringCoordinator, MonitoringStatus, MonitoringWarning};
pub use provider::{LocationProvider, MonitoredRegion, MonitoringError, PlatformEvent};
pub use simulated::{DEFAULT_REGION_LIMIT, SimulatedProvider};
