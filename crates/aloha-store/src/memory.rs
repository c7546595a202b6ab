//! In-process backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use aloha_core::Geofence;
use serde_json::Value;

use crate::codec::{decode_records, encode_records};
use crate::error::StoreError;
use crate::{GeofenceStore, LoadReport};

/// Keeps encoded records in memory.
///
/// Clones share the same records, so a test can keep a handle while the
/// manager owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Mutex<Vec<Value>>,
    reject_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored records with raw JSON values, valid or not.
    pub fn seed_raw(&self, records: Vec<Value>) {
        *self.records() = records;
    }

    /// Snapshot of the stored records as JSON values.
    #[must_use]
    pub fn raw_records(&self) -> Vec<Value> {
        self.records().clone()
    }

    /// Make subsequent `save_all` calls fail without touching stored records.
    pub fn reject_writes(&self, reject: bool) {
        self.inner.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Number of successful `save_all` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.inner
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl GeofenceStore for MemoryStore {
    fn load_all(&self) -> Result<LoadReport, StoreError> {
        Ok(decode_records(self.raw_records()))
    }

    fn save_all(&self, geofences: &[Geofence]) -> Result<(), StoreError> {
        if self.inner.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected("memory store is read-only".into()));
        }
        let records = encode_records(geofences)?;
        *self.records() = records;
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use aloha_core::{Coordinate, EventType};
    use pretty_assertions::assert_eq;

    use super::*;

    fn geofence(id: &str) -> Geofence {
        Geofence::with_identifier(id, Coordinate::new(1.0, 2.0), 10.0, "", EventType::OnExit)
            .unwrap()
    }

    #[test]
    fn empty_store_loads_nothing() {
        let report = MemoryStore::new().load_all().unwrap();
        assert!(report.geofences.is_empty());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn clones_share_records() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save_all(&[geofence("A")]).unwrap();
        assert_eq!(handle.load_all().unwrap().geofences, vec![geofence("A")]);
        assert_eq!(handle.save_count(), 1);
    }

    #[test]
    fn rejected_write_keeps_previous_records() {
        let store = MemoryStore::new();
        store.save_all(&[geofence("A")]).unwrap();
        store.reject_writes(true);

        let result = store.save_all(&[geofence("A"), geofence("B")]);
        assert!(matches!(result, Err(StoreError::WriteRejected(_))));
        assert_eq!(store.load_all().unwrap().geofences, vec![geofence("A")]);
        assert_eq!(store.save_count(), 1);
    }
}
