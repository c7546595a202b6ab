//! Collection-level encoding shared by the store backends.

use std::collections::HashSet;

use aloha_core::{Geofence, GeofenceRecord};
use serde_json::Value;

use crate::LoadReport;
use crate::error::StoreError;

/// Decode stored records one by one, dropping the ones that fail.
///
/// Later records repeating an identifier are dropped too, so the loaded
/// collection keeps the uniqueness invariant.
pub(crate) fn decode_records(values: Vec<Value>) -> LoadReport {
    let mut report = LoadReport::default();
    let mut seen = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        match GeofenceRecord::decode(value) {
            Ok(geofence) => {
                if seen.insert(geofence.identifier().to_string()) {
                    report.geofences.push(geofence);
                } else {
                    tracing::warn!(
                        index,
                        identifier = geofence.identifier(),
                        "skipping persisted geofence with duplicate identifier"
                    );
                    report.skipped += 1;
                }
            }
            Err(error) => {
                tracing::warn!(index, %error, "skipping corrupt geofence record");
                report.skipped += 1;
            }
        }
    }

    report
}

pub(crate) fn encode_records(geofences: &[Geofence]) -> Result<Vec<Value>, StoreError> {
    geofences
        .iter()
        .map(|geofence| geofence.to_record().encode().map_err(StoreError::from))
        .collect()
}
