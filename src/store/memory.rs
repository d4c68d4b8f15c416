//! In-memory record store for tests and dry runs.

use super::{Bucket, RecordStore, StorageRef, StoredRecord};
use crate::artifact::ArtifactKind;
use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::BTreeMap;

type SlotKey = (ArtifactKind, Bucket, String);

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<SlotKey, StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

fn slot(reference: &StorageRef) -> SlotKey {
    (reference.kind, reference.bucket, reference.key.clone())
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, reference: &StorageRef) -> Result<Option<StoredRecord>, StorageError> {
        Ok(self.records.read().get(&slot(reference)).cloned())
    }

    fn insert_new(&self, reference: &StorageRef, record: &StoredRecord) -> Result<bool, StorageError> {
        let mut records = self.records.write();
        let key = slot(reference);
        if records.contains_key(&key) {
            return Ok(false);
        }
        records.insert(key, record.clone());
        Ok(true)
    }

    fn remove(&self, reference: &StorageRef) -> Result<(), StorageError> {
        self.records.write().remove(&slot(reference));
        Ok(())
    }

    fn list(&self, kind: ArtifactKind, bucket: Bucket) -> Result<Vec<StorageRef>, StorageError> {
        Ok(self
            .records
            .read()
            .keys()
            .filter(|(k, b, _)| *k == kind && *b == bucket)
            .map(|(kind, bucket, key)| StorageRef {
                kind: *kind,
                bucket: *bucket,
                key: key.clone(),
            })
            .collect())
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
