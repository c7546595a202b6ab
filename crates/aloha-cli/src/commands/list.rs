use aloha_core::Geofence;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct GeofenceRow {
    pub identifier: String,
    pub title: String,
    pub subtitle: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Geofence> for GeofenceRow {
    fn from(geofence: &Geofence) -> Self {
        Self {
            identifier: geofence.identifier().to_string(),
            title: geofence.title().to_string(),
            subtitle: geofence.subtitle(),
            latitude: geofence.center().latitude,
            longitude: geofence.center().longitude,
        }
    }
}

/// Handle `aloha list`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows = ctx
        .manager
        .all()
        .await
        .iter()
        .map(GeofenceRow::from)
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
