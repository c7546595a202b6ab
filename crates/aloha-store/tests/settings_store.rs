//! Integration tests for the settings-file backend.

use std::collections::HashSet;

use aloha_core::{Coordinate, EventType, Geofence};
use aloha_store::{GeofenceStore, SettingsStore, StoreError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

fn geofence(id: &str, event_type: EventType) -> Geofence {
    Geofence::with_identifier(
        id,
        Coordinate::new(40.7061, -73.9969),
        75.25,
        format!("note for {id}"),
        event_type,
    )
    .unwrap()
}

fn store_in(dir: &TempDir) -> SettingsStore {
    SettingsStore::new(dir.path().join("settings.json"), "savedItems")
}

fn read_json(store: &SettingsStore) -> Value {
    serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap()
}

#[test]
fn missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let report = store_in(&dir).load_all().unwrap();
    assert!(report.geofences.is_empty());
    assert_eq!(report.skipped, 0);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(20)]
#[case(25)]
fn load_after_save_returns_same_collection(#[case] size: usize) {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let collection: Vec<Geofence> = (0..size)
        .map(|i| {
            let event_type = if i % 2 == 0 {
                EventType::OnEntry
            } else {
                EventType::OnExit
            };
            geofence(&format!("geo-{i:08x}"), event_type)
        })
        .collect();

    store.save_all(&collection).unwrap();
    let loaded = store.load_all().unwrap();

    assert_eq!(loaded.skipped, 0);
    assert_eq!(loaded.geofences, collection);
    let ids: HashSet<_> = loaded.geofences.iter().map(Geofence::identifier).collect();
    assert_eq!(ids.len(), size);
}

#[test]
fn save_replaces_previous_collection() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store
        .save_all(&[geofence("A", EventType::OnEntry), geofence("B", EventType::OnExit)])
        .unwrap();
    store.save_all(&[geofence("C", EventType::OnExit)]).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.geofences, vec![geofence("C", EventType::OnExit)]);
}

#[test]
fn persisted_layout_uses_flat_records_under_key() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save_all(&[geofence("A", EventType::OnEntry)]).unwrap();

    let json = read_json(&store);
    assert_eq!(
        json["savedItems"],
        json!([{
            "latitude": 40.7061,
            "longitude": -73.9969,
            "radius": 75.25,
            "identifier": "A",
            "note": "note for A",
            "eventType": "OnEntry",
        }])
    );
}

#[test]
fn other_settings_keys_survive_save() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(
        store.path(),
        r#"{"mapType": "satellite", "savedItems": []}"#,
    )
    .unwrap();

    store.save_all(&[geofence("A", EventType::OnExit)]).unwrap();

    let json = read_json(&store);
    assert_eq!(json["mapType"], json!("satellite"));
    assert_eq!(json["savedItems"].as_array().map(Vec::len), Some(1));
}

#[test]
fn corrupt_record_is_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store
        .save_all(&[
            geofence("A", EventType::OnEntry),
            geofence("B", EventType::OnExit),
            geofence("C", EventType::OnEntry),
        ])
        .unwrap();

    let mut json = read_json(&store);
    let items = json["savedItems"].as_array_mut().unwrap();
    items.insert(
        1,
        json!({
            "latitude": 1.0,
            "longitude": 2.0,
            "radius": 3.0,
            "identifier": "bad",
            "note": "",
            "eventType": "On Entry",
        }),
    );
    std::fs::write(store.path(), json.to_string()).unwrap();

    let report = store.load_all().unwrap();
    let ids: Vec<_> = report.geofences.iter().map(Geofence::identifier).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(report.skipped, 1);
}

#[test]
fn malformed_file_is_reported_and_left_alone() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "[1, 2, 3]").unwrap();

    assert!(matches!(store.load_all(), Err(StoreError::Malformed { .. })));
    assert!(matches!(
        store.save_all(&[geofence("A", EventType::OnEntry)]),
        Err(StoreError::Malformed { .. })
    ));
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[1, 2, 3]");
}

#[test]
fn non_array_collection_is_malformed() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), r#"{"savedItems": {"identifier": "A"}}"#).unwrap();

    assert!(matches!(store.load_all(), Err(StoreError::Malformed { .. })));
    assert!(matches!(
        store.save_all(&[geofence("A", EventType::OnEntry)]),
        Err(StoreError::Malformed { .. })
    ));
}

#[test]
fn save_leaves_no_temp_files_behind() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save_all(&[geofence("A", EventType::OnEntry)]).unwrap();
    store.save_all(&[]).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("settings.json")]);
}

#[test]
fn creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("nested/app/settings.json"), "pins");
    store.save_all(&[geofence("A", EventType::OnEntry)]).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.geofences.len(), 1);
    assert_eq!(store.key(), "pins");
    assert_eq!(read_json(&store)[store.key()].as_array().map(Vec::len), Some(1));
}
