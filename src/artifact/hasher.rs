//! Fingerprint computation for artifacts

use crate::types::Fingerprint;

/// Compute the content fingerprint of an artifact from its pages.
///
/// Each page is length-prefixed so page boundaries are part of the identity:
/// `["ab"]` and `["a", "b"]` never collide. Title, author, precedence and
/// provenance are not inputs.
pub fn compute_fingerprint<S: AsRef<str>>(pages: &[S]) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(pages.len() as u64).to_le_bytes());
    for page in pages {
        let bytes = page.as_ref().as_bytes();
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    Fingerprint::from_le_bytes(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_boundaries_matter() {
        assert_ne!(compute_fingerprint(&["ab"]), compute_fingerprint(&["a", "b"]));
        assert_ne!(compute_fingerprint::<&str>(&[]), compute_fingerprint(&[""]));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let pages = vec!["first".to_string(), "second".to_string()];
        assert_eq!(compute_fingerprint(&pages), compute_fingerprint(&pages.clone()));
    }

    proptest! {
        #[test]
        fn identical_pages_identical_fingerprint(pages in prop::collection::vec(".*", 0..6)) {
            let copy: Vec<String> = pages.iter().cloned().collect();
            prop_assert_eq!(compute_fingerprint(&pages), compute_fingerprint(&copy));
        }
    }
}
