//! In-process conditions store for tests and fixtures.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::store::{ConditionsPayload, ConditionsStore, StoreError, StoredObject};
use crate::Timestamp;

/// In-memory [`ConditionsStore`] holding any number of objects per key,
/// each with its own validity interval.
///
/// Follows the lookup contract of the remote store: a fetch returns the
/// object whose interval covers the requested timestamp, or `NotFound`.
/// Fetch attempts are counted per key so tests can assert that a valid
/// cache slot suppresses refetching.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<MemoryObject>>>,
    fetch_counts: Mutex<HashMap<String, usize>>,
}

#[derive(Debug, Clone)]
struct MemoryObject {
    start: Timestamp,
    end: Timestamp,
    object: StoredObject,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw object covering `[start, end)`.
    ///
    /// The object is stored exactly as given; use this to build fixtures
    /// with missing or broken metadata.
    pub fn insert_object(
        &self,
        key: &str,
        start: Timestamp,
        end: Timestamp,
        object: StoredObject,
    ) {
        let mut objects = self.objects.lock().unwrap();
        objects
            .entry(key.to_string())
            .or_default()
            .push(MemoryObject { start, end, object });
    }

    /// Insert payload bytes covering `[start, end)` with well-formed
    /// validity metadata.
    pub fn insert_bytes(&self, key: &str, start: Timestamp, end: Timestamp, payload: Vec<u8>) {
        self.insert_object(key, start, end, StoredObject::with_validity(payload, start, end));
    }

    /// Insert a typed payload covering `[start, end)` with well-formed
    /// validity metadata.
    pub fn insert_payload<P: ConditionsPayload>(
        &self,
        key: &str,
        start: Timestamp,
        end: Timestamp,
        payload: &P,
    ) {
        self.insert_bytes(key, start, end, payload.encode());
    }

    /// Number of fetch attempts seen for `key`, hits and misses alike.
    pub fn fetch_count(&self, key: &str) -> usize {
        self.fetch_counts
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}

impl ConditionsStore for MemoryStore {
    fn fetch(&self, key: &str, timestamp: Timestamp) -> Result<StoredObject, StoreError> {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert(0) += 1;

        let objects = self.objects.lock().unwrap();
        objects
            .get(key)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|entry| entry.start <= timestamp && timestamp < entry.end)
            })
            .map(|entry| entry.object.clone())
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
                timestamp,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_returns_object_covering_timestamp() {
        let store = MemoryStore::new();
        store.insert_bytes("calib/x", 0, 100, vec![1]);
        store.insert_bytes("calib/x", 100, 200, vec![2]);

        assert_eq!(store.fetch("calib/x", 50).unwrap().payload, vec![1]);
        assert_eq!(store.fetch("calib/x", 100).unwrap().payload, vec![2]);
        assert_eq!(store.fetch("calib/x", 199).unwrap().payload, vec![2]);
    }

    #[test]
    fn fetch_outside_every_interval_is_not_found() {
        let store = MemoryStore::new();
        store.insert_bytes("calib/x", 0, 100, vec![1]);
        assert_eq!(
            store.fetch("calib/x", 100),
            Err(StoreError::NotFound {
                key: "calib/x".to_string(),
                timestamp: 100,
            })
        );
    }

    #[test]
    fn unknown_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.fetch("nope", 0),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn fetch_attempts_are_counted() {
        let store = MemoryStore::new();
        store.insert_bytes("calib/x", 0, 100, vec![1]);
        assert_eq!(store.fetch_count("calib/x"), 0);
        let _ = store.fetch("calib/x", 50);
        let _ = store.fetch("calib/x", 500);
        assert_eq!(store.fetch_count("calib/x"), 2);
    }
}
