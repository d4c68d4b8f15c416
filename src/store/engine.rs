//! Dedup & Placement Engine
//!
//! Collapses artifacts with identical content and keeps the canonical copy in
//! the primary bucket. The greedy decision made on ingest is backed by a
//! reconciliation pass that restores the placement invariant for anything the
//! greedy rule could not see, such as records left behind by an earlier run.

use super::{Bucket, RecordStore, StorageRef, StoredRecord};
use crate::artifact::{Artifact, ArtifactKind};
use crate::error::StorageError;
use crate::types::{fingerprint_hex, Fingerprint, CANONICAL_PRECEDENCE};
use crate::warnings::{Severity, WarningSink};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Outcome of ingesting one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlacementDecision {
    /// First record for this fingerprint
    NewPrimary,
    /// Duplicate of an existing primary
    NewSecondary,
    /// Canonical copy that displaced a non-canonical primary
    Accepted,
}

/// Summary of a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Canonical secondaries swapped with a non-canonical primary
    pub swaps: usize,
    /// Secondaries promoted into an empty primary slot
    pub promotions: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.swaps == 0 && self.promotions == 0
    }
}

#[derive(Debug, Clone)]
struct IndexedRecord {
    reference: StorageRef,
    precedence: u8,
    sequence: u64,
}

impl IndexedRecord {
    fn is_canonical(&self) -> bool {
        self.precedence == CANONICAL_PRECEDENCE
    }
}

/// Index entry: where the copies of one fingerprint live
#[derive(Debug, Default)]
struct FingerprintEntry {
    primary: Option<IndexedRecord>,
    secondary: Vec<IndexedRecord>,
}

impl FingerprintEntry {
    /// Lowest-sequence canonical secondary
    fn canonical_secondary(&self) -> Option<usize> {
        self.secondary
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_canonical())
            .min_by_key(|(_, r)| r.sequence)
            .map(|(i, _)| i)
    }

    /// Lowest precedence secondary, earliest first on ties
    fn best_secondary(&self) -> Option<usize> {
        self.secondary
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| (r.precedence, r.sequence))
            .map(|(i, _)| i)
    }

    fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_empty()
    }

    fn violates_placement(&self) -> bool {
        let primary_canonical = self.primary.as_ref().map(|p| p.is_canonical()).unwrap_or(false);
        !primary_canonical && self.secondary.iter().any(|r| r.is_canonical())
    }
}

/// Dedup engine over a record store.
///
/// Owned by the caller for the duration of a run; the index mirrors the
/// store's contents and is rebuilt from it on open.
pub struct DedupEngine<S: RecordStore> {
    store: S,
    index: HashMap<(ArtifactKind, Fingerprint), FingerprintEntry>,
    next_sequence: u64,
}

impl<S: RecordStore> DedupEngine<S> {
    /// Open an engine over `store`, indexing every record already in it
    pub fn open(store: S) -> Result<Self, StorageError> {
        let mut engine = Self {
            store,
            index: HashMap::new(),
            next_sequence: 0,
        };
        for kind in ArtifactKind::ALL {
            for bucket in Bucket::ALL {
                for (reference, record) in engine.store.load_all(kind, bucket)? {
                    engine.index_existing(reference, &record);
                }
            }
        }
        tracing::debug!(
            fingerprints = engine.index.len(),
            next_sequence = engine.next_sequence,
            "dedup index rebuilt"
        );
        Ok(engine)
    }

    fn index_existing(&mut self, reference: StorageRef, record: &StoredRecord) {
        self.next_sequence = self.next_sequence.max(record.sequence + 1);
        let indexed = IndexedRecord {
            precedence: record.precedence,
            sequence: record.sequence,
            reference,
        };
        let entry = self.index.entry((record.kind, record.fingerprint)).or_default();
        match indexed.reference.bucket {
            Bucket::Primary if entry.primary.is_none() => entry.primary = Some(indexed),
            Bucket::Primary => {
                tracing::warn!(
                    "Extra primary record {} for fingerprint {}; ignoring",
                    indexed.reference,
                    fingerprint_hex(record.fingerprint)
                );
            }
            Bucket::Secondary => entry.secondary.push(indexed),
        }
    }

    /// Decide where an artifact goes and write it
    pub fn ingest(&mut self, artifact: &Artifact) -> Result<PlacementDecision, StorageError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let record = StoredRecord::from_artifact(artifact, sequence);
        let key = (record.kind, record.fingerprint);
        let entry = self.index.entry(key).or_default();
        let placed = place(&self.store, entry, &record);
        if placed.is_err() && self.index.get(&key).map(FingerprintEntry::is_empty).unwrap_or(false) {
            self.index.remove(&key);
        }
        placed
    }

    /// Restore the placement invariant across the whole store.
    ///
    /// Swaps a canonical secondary with a non-canonical primary, and
    /// promotes the best secondary where a fingerprint has no primary at all.
    /// Running it again on a reconciled store changes nothing.
    pub fn reconcile(&mut self, sink: &mut dyn WarningSink) -> Result<ReconcileReport, StorageError> {
        let mut report = ReconcileReport::default();
        let mut keys: Vec<(ArtifactKind, Fingerprint)> = self.index.keys().copied().collect();
        keys.sort();

        for key in keys {
            let Some(entry) = self.index.get_mut(&key) else {
                continue;
            };
            let candidate = match &entry.primary {
                Some(primary) if !primary.is_canonical() => entry.canonical_secondary(),
                Some(_) => None,
                None => entry.best_secondary(),
            };
            let Some(position) = candidate else {
                continue;
            };

            let swapping = entry.primary.is_some();
            if let Some(mut previous) = entry.primary.take() {
                match self.store.relocate(&previous.reference, Bucket::Secondary) {
                    Ok(moved) => {
                        previous.reference = moved;
                        entry.secondary.push(previous);
                    }
                    Err(e) => {
                        entry.primary = Some(previous);
                        return Err(e);
                    }
                }
            }

            let mut promoted = entry.secondary.remove(position);
            match self.store.relocate(&promoted.reference, Bucket::Primary) {
                Ok(moved) => promoted.reference = moved,
                Err(e) => {
                    entry.secondary.push(promoted);
                    return Err(e);
                }
            }
            let message = format!(
                "{} {} copy of {} ({}) into primary",
                if swapping { "swapped" } else { "promoted" },
                key.0.as_str(),
                fingerprint_hex(key.1),
                promoted.reference.key
            );
            entry.primary = Some(promoted);
            sink.emit(Severity::Info, message);
            if swapping {
                report.swaps += 1;
            } else {
                report.promotions += 1;
            }
        }

        self.store.flush()?;
        tracing::info!(
            swaps = report.swaps,
            promotions = report.promotions,
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Fingerprints whose canonical copy currently sits outside primary
    pub fn placement_violations(&self) -> usize {
        self.index.values().filter(|e| e.violates_placement()).count()
    }

    /// Record count per kind and bucket
    pub fn counts(&self) -> BTreeMap<(ArtifactKind, Bucket), usize> {
        let mut counts = BTreeMap::new();
        for kind in ArtifactKind::ALL {
            for bucket in Bucket::ALL {
                counts.insert((kind, bucket), 0);
            }
        }
        for ((kind, _), entry) in &self.index {
            if entry.primary.is_some() {
                *counts.entry((*kind, Bucket::Primary)).or_insert(0) += 1;
            }
            *counts.entry((*kind, Bucket::Secondary)).or_insert(0) += entry.secondary.len();
        }
        counts
    }

    /// Number of distinct fingerprints seen
    pub fn unique_count(&self) -> usize {
        self.index.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.store.flush()
    }
}

/// Write `record` into its fingerprint's entry, keeping the entry in step
/// with the store on failure
fn place<S: RecordStore>(
    store: &S,
    entry: &mut FingerprintEntry,
    record: &StoredRecord,
) -> Result<PlacementDecision, StorageError> {
    let decision = match entry.primary.as_ref().map(|p| p.is_canonical()) {
        None => PlacementDecision::NewPrimary,
        Some(false) if record.is_canonical() => PlacementDecision::Accepted,
        Some(_) => PlacementDecision::NewSecondary,
    };

    if decision == PlacementDecision::NewSecondary {
        let reference = store.store(Bucket::Secondary, record)?;
        entry.secondary.push(IndexedRecord {
            reference,
            precedence: record.precedence,
            sequence: record.sequence,
        });
        return Ok(decision);
    }

    if let Some(mut previous) = entry.primary.take() {
        match store.relocate(&previous.reference, Bucket::Secondary) {
            Ok(moved) => {
                previous.reference = moved;
                entry.secondary.push(previous);
            }
            Err(e) => {
                entry.primary = Some(previous);
                return Err(e);
            }
        }
    }
    let reference = store.store(Bucket::Primary, record)?;
    entry.primary = Some(IndexedRecord {
        reference,
        precedence: record.precedence,
        sequence: record.sequence,
    });
    if decision == PlacementDecision::Accepted {
        tracing::debug!(
            fingerprint = %fingerprint_hex(record.fingerprint),
            "canonical copy displaced duplicate primary"
        );
    }
    Ok(decision)
}
