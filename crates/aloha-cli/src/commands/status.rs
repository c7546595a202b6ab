use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub monitoring_supported: bool,
    pub authorization: String,
    pub geofences: usize,
    pub limit: usize,
    pub skipped_records: usize,
    pub monitored_regions: Vec<String>,
    pub settings_path: String,
}

/// Handle `aloha status`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = StatusResponse {
        monitoring_supported: ctx.manager.coordinator().is_monitoring_supported(),
        authorization: ctx.manager.authorization_state().await.to_string(),
        geofences: ctx.manager.count().await,
        limit: ctx.config.monitoring.max_geofences,
        skipped_records: ctx.startup.skipped,
        monitored_regions: ctx
            .provider
            .regions()
            .into_iter()
            .map(|region| region.identifier)
            .collect(),
        settings_path: ctx.config.storage.settings_path.display().to_string(),
    };
    output(&response, flags.format)
}
