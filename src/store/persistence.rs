//! Sled-backed record store.
//!
//! One tree per artifact kind and bucket (`document.primary`, ...), keyed by
//! the record key, with bincode-encoded values.

use super::{Bucket, RecordStore, StorageRef, StoredRecord};
use crate::artifact::ArtifactKind;
use crate::error::StorageError;
use std::path::Path;

pub struct SledRecordStore {
    db: sled::Db,
}

impl SledRecordStore {
    /// Open (or create) a store at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path.as_ref())?;
        let db = sled::open(path.as_ref())?;
        Ok(Self { db })
    }

    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    fn tree(&self, kind: ArtifactKind, bucket: Bucket) -> Result<sled::Tree, StorageError> {
        Ok(self
            .db
            .open_tree(format!("{}.{}", kind.as_str(), bucket.as_str()))?)
    }
}

impl RecordStore for SledRecordStore {
    fn load(&self, reference: &StorageRef) -> Result<Option<StoredRecord>, StorageError> {
        let tree = self.tree(reference.kind, reference.bucket)?;
        match tree.get(reference.key.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn insert_new(&self, reference: &StorageRef, record: &StoredRecord) -> Result<bool, StorageError> {
        let tree = self.tree(reference.kind, reference.bucket)?;
        let bytes = bincode::serialize(record)?;
        let swapped = tree.compare_and_swap(
            reference.key.as_bytes(),
            None as Option<&[u8]>,
            Some(bytes),
        )?;
        Ok(swapped.is_ok())
    }

    fn remove(&self, reference: &StorageRef) -> Result<(), StorageError> {
        let tree = self.tree(reference.kind, reference.bucket)?;
        tree.remove(reference.key.as_bytes())?;
        Ok(())
    }

    fn list(&self, kind: ArtifactKind, bucket: Bucket) -> Result<Vec<StorageRef>, StorageError> {
        let tree = self.tree(kind, bucket)?;
        let mut references = Vec::new();
        for key in tree.iter().keys() {
            let key = key?;
            let key = String::from_utf8(key.to_vec()).map_err(|e| {
                StorageError::Serialization(format!("Non-UTF-8 record key: {}", e))
            })?;
            references.push(StorageRef { kind, bucket, key });
        }
        Ok(references)
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}
