//! Keyed storage of measurement documents.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use linekit_core::Measurement;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

pub type RecordId = u64;

/// A stored measurement with its bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub id: RecordId,
    pub value: Measurement,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage backend for measurement records.
pub trait MeasurementStore: Send + Sync {
    /// Stores a new record and returns its id.
    fn insert(&self, value: Measurement) -> StoreResult<RecordId>;

    /// All records, most recently updated first.
    fn list(&self) -> StoreResult<Vec<MeasurementRecord>>;

    fn get(&self, id: RecordId) -> StoreResult<Option<MeasurementRecord>>;

    /// Replaces the value of record `id` and refreshes its `updated_at`.
    fn update(&self, id: RecordId, value: Measurement) -> StoreResult<()>;

    /// Returns `false` if no record had this id.
    fn delete(&self, id: RecordId) -> StoreResult<bool>;
}

#[derive(Debug, Default)]
struct Records {
    next_id: RecordId,
    last_stamp: Option<DateTime<Utc>>,
    by_id: BTreeMap<RecordId, MeasurementRecord>,
}

impl Records {
    // strictly increasing, so list order is stable even within one clock tick
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Records>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MeasurementStore for InMemoryStore {
    fn insert(&self, value: Measurement) -> StoreResult<RecordId> {
        let mut records = self.records.write();
        records.next_id += 1;
        let id = records.next_id;
        let now = records.stamp();
        records.by_id.insert(
            id,
            MeasurementRecord {
                id,
                value,
                created_at: now,
                updated_at: now,
            },
        );
        tracing::debug!("Inserted measurement record {}", id);
        Ok(id)
    }

    fn list(&self) -> StoreResult<Vec<MeasurementRecord>> {
        let mut list: Vec<MeasurementRecord> =
            self.records.read().by_id.values().cloned().collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<MeasurementRecord>> {
        Ok(self.records.read().by_id.get(&id).cloned())
    }

    fn update(&self, id: RecordId, value: Measurement) -> StoreResult<()> {
        let mut records = self.records.write();
        if !records.by_id.contains_key(&id) {
            return Err(StoreError::NotFound { id });
        }
        let now = records.stamp();
        if let Some(record) = records.by_id.get_mut(&id) {
            record.value = value;
            record.updated_at = now;
        }
        tracing::debug!("Updated measurement record {}", id);
        Ok(())
    }

    fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let removed = self.records.write().by_id.remove(&id).is_some();
        if removed {
            tracing::debug!("Deleted measurement record {}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Measurement {
        Measurement::new("plan.png", Some(name))
    }

    #[test]
    fn test_ids_start_at_one() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.insert(named("a")).unwrap(), 1);
        assert_eq!(store.insert(named("b")).unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let store = InMemoryStore::new();
        let first = store.insert(named("a")).unwrap();
        assert!(store.delete(first).unwrap());
        assert_eq!(store.insert(named("b")).unwrap(), 2);
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let store = InMemoryStore::new();
        let a = store.insert(named("a")).unwrap();
        let b = store.insert(named("b")).unwrap();
        let c = store.insert(named("c")).unwrap();

        store.update(a, named("a2")).unwrap();

        let ids: Vec<RecordId> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, c, b]);
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let store = InMemoryStore::new();
        let id = store.insert(named("a")).unwrap();
        let before = store.get(id).unwrap().unwrap();

        store.update(id, named("renamed")).unwrap();
        let after = store.get(id).unwrap().unwrap();

        assert_eq!(after.value.name, "renamed");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn test_missing_records() {
        let store = InMemoryStore::new();
        assert_eq!(store.get(4).unwrap(), None);
        assert_eq!(
            store.update(4, named("x")),
            Err(StoreError::NotFound { id: 4 })
        );
        assert!(!store.delete(4).unwrap());
    }
}
