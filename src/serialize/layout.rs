//! Deterministic placement for signage output.
//!
//! One primary offset per distinct fingerprint, handed out in first-seen
//! order; copies of the same content stack along the secondary offset.

use crate::types::Fingerprint;
use std::collections::HashMap;

/// `(offset_a, offset_b)`: primary offset, then occurrence offset
pub type Placement = (u32, u32);

#[derive(Debug, Default)]
pub struct LayoutAssigner {
    next_primary: u32,
    primaries: HashMap<Fingerprint, u32>,
    occurrences: HashMap<Fingerprint, u32>,
}

impl LayoutAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement for the `occurrence_index`-th copy of `fingerprint`
    pub fn assign_layout(&mut self, fingerprint: Fingerprint, occurrence_index: u32) -> Placement {
        let next_primary = &mut self.next_primary;
        let primary = *self.primaries.entry(fingerprint).or_insert_with(|| {
            let assigned = *next_primary;
            *next_primary += 1;
            assigned
        });
        (primary, occurrence_index)
    }

    /// Placement for the next copy of `fingerprint`, counting occurrences
    pub fn next_placement(&mut self, fingerprint: Fingerprint) -> Placement {
        let occurrence = self.occurrences.entry(fingerprint).or_insert(0);
        let index = *occurrence;
        *occurrence += 1;
        self.assign_layout(fingerprint, index)
    }

    /// Distinct fingerprints placed so far
    pub fn unique_count(&self) -> usize {
        self.primaries.len()
    }
}
