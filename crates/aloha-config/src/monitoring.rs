//! Region-monitoring limits and the simulated platform used by headless hosts.

use aloha_core::AuthorizationState;
use serde::{Deserialize, Serialize};

/// Platform ceiling on simultaneously monitored regions.
const fn default_max_geofences() -> usize {
    20
}

const fn default_simulate_supported() -> bool {
    true
}

const fn default_simulate_authorization() -> AuthorizationState {
    AuthorizationState::AuthorizedAlways
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// Maximum number of geofences accepted by `add`.
    #[serde(default = "default_max_geofences")]
    pub max_geofences: usize,

    /// Whether the simulated provider reports region monitoring as available.
    #[serde(default = "default_simulate_supported")]
    pub simulate_supported: bool,

    /// Authorization the simulated provider starts with.
    #[serde(default = "default_simulate_authorization")]
    pub simulate_authorization: AuthorizationState,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_geofences: default_max_geofences(),
            simulate_supported: default_simulate_supported(),
            simulate_authorization: default_simulate_authorization(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = MonitoringConfig::default();
        assert_eq!(config.max_geofences, 20);
        assert!(config.simulate_supported);
        assert_eq!(
            config.simulate_authorization,
            AuthorizationState::AuthorizedAlways
        );
    }
}
