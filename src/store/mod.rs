//! Record Store
//!
//! Durable storage for accepted artifacts. Records live in two buckets per
//! artifact kind: `Primary` holds at most one record per fingerprint, and
//! `Secondary` holds every further copy. Records may be relocated between
//! buckets but are never edited.

pub mod engine;
pub mod memory;
pub mod persistence;

use crate::artifact::{Artifact, ArtifactKind};
use crate::error::StorageError;
use crate::types::{fingerprint_hex, Fingerprint, CANONICAL_PRECEDENCE};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use engine::{DedupEngine, PlacementDecision, ReconcileReport};
pub use memory::MemoryRecordStore;
pub use persistence::SledRecordStore;

/// Attempts at a free key before a write or relocation gives up
pub const MAX_KEY_ATTEMPTS: usize = 4;

/// Storage bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    Primary,
    Secondary,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Bucket::Primary, Bucket::Secondary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Primary => "primary",
            Bucket::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to one stored record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageRef {
    pub kind: ArtifactKind,
    pub bucket: Bucket,
    pub key: String,
}

impl fmt::Display for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind.as_str(), self.bucket, self.key)
    }
}

/// Persisted form of an accepted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Run-global ingestion order
    pub sequence: u64,
    pub kind: ArtifactKind,
    pub fingerprint: Fingerprint,
    pub title: Option<String>,
    pub author: Option<String>,
    pub precedence: u8,
    pub pages: Vec<String>,
    pub provenance: String,
}

impl StoredRecord {
    pub fn from_artifact(artifact: &Artifact, sequence: u64) -> Self {
        Self {
            sequence,
            kind: artifact.kind,
            fingerprint: artifact.fingerprint(),
            title: artifact.title.clone(),
            author: artifact.author.clone(),
            precedence: artifact.precedence,
            pages: artifact.pages.clone(),
            provenance: artifact.provenance.clone(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.precedence == CANONICAL_PRECEDENCE
    }

    /// Preferred key in `bucket`: the fingerprint for primary records,
    /// fingerprint plus sequence for secondary ones
    pub fn key_for(&self, bucket: Bucket) -> String {
        match bucket {
            Bucket::Primary => fingerprint_hex(self.fingerprint),
            Bucket::Secondary => format!("{}-{}", fingerprint_hex(self.fingerprint), self.sequence),
        }
    }
}

/// Key tried on the given attempt: the base key, then `<base>~N`
pub fn alternate_key(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}~{}", base, attempt)
    }
}

/// Content-addressed key/value surface for stored records.
///
/// Implementations supply the primitive operations; `store` and `relocate`
/// build collision-safe writes on top of them.
pub trait RecordStore {
    fn load(&self, reference: &StorageRef) -> Result<Option<StoredRecord>, StorageError>;

    /// Write only if `reference` is free; `Ok(false)` when occupied
    fn insert_new(&self, reference: &StorageRef, record: &StoredRecord) -> Result<bool, StorageError>;

    fn remove(&self, reference: &StorageRef) -> Result<(), StorageError>;

    fn list(&self, kind: ArtifactKind, bucket: Bucket) -> Result<Vec<StorageRef>, StorageError>;

    fn flush(&self) -> Result<(), StorageError>;

    /// Store a record under its preferred key, or a free alternate
    fn store(&self, bucket: Bucket, record: &StoredRecord) -> Result<StorageRef, StorageError> {
        let base = record.key_for(bucket);
        for attempt in 0..MAX_KEY_ATTEMPTS {
            let reference = StorageRef {
                kind: record.kind,
                bucket,
                key: alternate_key(&base, attempt),
            };
            if self.insert_new(&reference, record)? {
                return Ok(reference);
            }
        }
        Err(StorageError::RelocationExhausted {
            key: base,
            attempts: MAX_KEY_ATTEMPTS,
        })
    }

    /// Move a record to another bucket.
    ///
    /// The destination is written before the source is removed; a failed
    /// write moves on to the next alternate key and the source is kept
    /// whenever every attempt fails.
    fn relocate(&self, reference: &StorageRef, to: Bucket) -> Result<StorageRef, StorageError> {
        let record = self
            .load(reference)?
            .ok_or_else(|| StorageError::NotFound(reference.to_string()))?;
        let base = record.key_for(to);
        for attempt in 0..MAX_KEY_ATTEMPTS {
            let destination = StorageRef {
                kind: record.kind,
                bucket: to,
                key: alternate_key(&base, attempt),
            };
            if destination == *reference {
                continue;
            }
            match self.insert_new(&destination, &record) {
                Ok(true) => {
                    self.remove(reference)?;
                    return Ok(destination);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Failed to write {}: {}, trying alternate key", destination, e);
                }
            }
        }
        Err(StorageError::RelocationExhausted {
            key: base,
            attempts: MAX_KEY_ATTEMPTS,
        })
    }

    /// Every record in a bucket, in ingestion order
    fn load_all(&self, kind: ArtifactKind, bucket: Bucket) -> Result<Vec<(StorageRef, StoredRecord)>, StorageError> {
        let mut records = Vec::new();
        for reference in self.list(kind, bucket)? {
            if let Some(record) = self.load(&reference)? {
                records.push((reference, record));
            }
        }
        records.sort_by_key(|(_, record)| record.sequence);
        Ok(records)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(&self, reference: &StorageRef) -> Result<Option<StoredRecord>, StorageError> {
        (**self).load(reference)
    }

    fn insert_new(&self, reference: &StorageRef, record: &StoredRecord) -> Result<bool, StorageError> {
        (**self).insert_new(reference, record)
    }

    fn remove(&self, reference: &StorageRef) -> Result<(), StorageError> {
        (**self).remove(reference)
    }

    fn list(&self, kind: ArtifactKind, bucket: Bucket) -> Result<Vec<StorageRef>, StorageError> {
        (**self).list(kind, bucket)
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}
