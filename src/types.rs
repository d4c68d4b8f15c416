//! Core types shared across the extraction pipeline.

/// Fingerprint: content identity of an artifact, derived from its pages only
pub type Fingerprint = u64;

/// Slot index of an item inside a container
pub type SlotIndex = i64;

/// Precedence of the canonical (original) copy
pub const CANONICAL_PRECEDENCE: u8 = 0;

/// Highest precedence value the save format defines (copy of a copy of a copy)
pub const MAX_PRECEDENCE: u8 = 3;

/// Default nesting ceiling for container traversal
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Line slots per signage face
pub const LINES_PER_FACE: usize = 4;

/// Render a fingerprint as the fixed-width hex key used by storage
pub fn fingerprint_hex(fingerprint: Fingerprint) -> String {
    hex::encode(fingerprint.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_hex_is_fixed_width() {
        assert_eq!(fingerprint_hex(1), "0000000000000001");
        assert_eq!(fingerprint_hex(u64::MAX).len(), 16);
    }
}
