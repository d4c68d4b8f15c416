//! Artifacts
//!
//! Textual units found inside the save tree: multi-page documents (books) and
//! signage boards (signs). Artifacts are created by the walker, consumed by the
//! dedup engine, and never mutated after creation.

pub mod hasher;

use crate::types::{Fingerprint, CANONICAL_PRECEDENCE};
use serde::{Deserialize, Serialize};

pub use hasher::compute_fingerprint;

/// Artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactKind {
    MultiPageDocument,
    SignageBoard,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::MultiPageDocument, ArtifactKind::SignageBoard];

    /// Short name used in storage tree names and output files
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::MultiPageDocument => "document",
            ArtifactKind::SignageBoard => "signage",
        }
    }
}

/// Logical fields resolved from either physical layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtifactFields {
    pub kind: ArtifactKind,
    pub item_id: Option<String>,
    pub item_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub precedence: u8,
    pub pages: Vec<String>,
}

impl RawArtifactFields {
    pub fn signage(item_id: Option<String>, pages: Vec<String>) -> Self {
        Self {
            kind: ArtifactKind::SignageBoard,
            item_id,
            item_count: 1,
            title: None,
            author: None,
            precedence: CANONICAL_PRECEDENCE,
            pages,
        }
    }
}

/// One extracted textual unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub title: Option<String>,
    pub author: Option<String>,
    pub precedence: u8,
    pub pages: Vec<String>,
    pub provenance: String,
    fingerprint: Fingerprint,
}

impl Artifact {
    /// Create an artifact; the fingerprint is computed once here
    pub fn new(
        kind: ArtifactKind,
        title: Option<String>,
        author: Option<String>,
        precedence: u8,
        pages: Vec<String>,
        provenance: String,
    ) -> Self {
        let fingerprint = compute_fingerprint(&pages);
        Self {
            kind,
            title,
            author,
            precedence,
            pages,
            provenance,
            fingerprint,
        }
    }

    pub fn from_fields(fields: RawArtifactFields, provenance: String) -> Self {
        Self::new(
            fields.kind,
            fields.title,
            fields.author,
            fields.precedence,
            fields.pages,
            provenance,
        )
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn is_canonical(&self) -> bool {
        self.precedence == CANONICAL_PRECEDENCE
    }
}

/// Walker event: an artifact and the nesting depth it was found at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFound {
    pub artifact: Artifact,
    pub depth: usize,
}
