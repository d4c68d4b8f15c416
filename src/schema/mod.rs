//! Schema Resolver
//!
//! Maps the two known physical encodings of items and signs onto the same
//! logical fields. The generation is supplied by the caller per source tree
//! and dispatched once through the closed `Layout` union.
//!
//! Resolution never fails loudly: a missing key or a node of the wrong kind
//! at an expected path means "not an artifact" and yields `None`.

pub mod container;
pub mod legacy;
pub mod modern;
pub mod text;

use crate::artifact::RawArtifactFields;
use crate::error::ApiError;
use crate::tree::TreeNode;
use crate::types::{SlotIndex, CANONICAL_PRECEDENCE, MAX_PRECEDENCE};
use crate::warnings::WarningSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use container::{node_id, normalize_id, resolve_container, ContainerKind, DyeColour};
pub use legacy::LegacyLayout;
pub use modern::ModernLayout;

/// First data version that stores item data as components
pub const COMPONENTS_DATA_VERSION: i64 = 3837;

/// Which physical field layout a source tree uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaGeneration {
    Legacy,
    Modern,
}

impl SchemaGeneration {
    /// Generation implied by a save's data version
    pub fn from_data_version(data_version: i64) -> Self {
        if data_version >= COMPONENTS_DATA_VERSION {
            SchemaGeneration::Modern
        } else {
            SchemaGeneration::Legacy
        }
    }
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaGeneration::Legacy => write!(f, "legacy"),
            SchemaGeneration::Modern => write!(f, "modern"),
        }
    }
}

impl FromStr for SchemaGeneration {
    type Err = ApiError;

    /// Accepts `legacy`, `modern`, or a game version such as `1.20.4`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => return Ok(SchemaGeneration::Legacy),
            "modern" => return Ok(SchemaGeneration::Modern),
            _ => {}
        }
        let parts: Vec<u32> = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| ApiError::InvalidGeneration(s.to_string()))?;
        match parts.as_slice() {
            [1, minor] => Ok(if *minor > 20 {
                SchemaGeneration::Modern
            } else {
                SchemaGeneration::Legacy
            }),
            [1, minor, patch] => Ok(if (*minor, *patch) >= (20, 5) {
                SchemaGeneration::Modern
            } else {
                SchemaGeneration::Legacy
            }),
            _ => Err(ApiError::InvalidGeneration(s.to_string())),
        }
    }
}

/// Field extraction for one physical layout
pub trait FieldLayout {
    fn generation(&self) -> SchemaGeneration;

    /// Document fields of a book item
    fn document_fields<N: TreeNode>(
        &self,
        item: &N,
        sink: &mut dyn WarningSink,
    ) -> Option<RawArtifactFields>;

    /// Stack count of an item; 1 when absent
    fn item_count<N: TreeNode>(&self, item: &N) -> u32;

    /// Slots of a box-like or stack-like item
    fn item_container_slots<'n, N: TreeNode>(
        &self,
        item: &'n N,
        kind: ContainerKind,
    ) -> Option<Vec<(SlotIndex, &'n N)>>;

    /// Sign faces in this layout's encoding
    fn sign_faces<N: TreeNode>(&self, block_entity: &N) -> Option<Vec<Vec<String>>>;
}

/// The closed set of layouts, chosen once per source tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Legacy(LegacyLayout),
    Modern(ModernLayout),
}

impl Layout {
    pub fn for_generation(generation: SchemaGeneration) -> Self {
        match generation {
            SchemaGeneration::Legacy => Layout::Legacy(LegacyLayout),
            SchemaGeneration::Modern => Layout::Modern(ModernLayout),
        }
    }

    fn other(&self) -> Layout {
        match self {
            Layout::Legacy(_) => Layout::Modern(ModernLayout),
            Layout::Modern(_) => Layout::Legacy(LegacyLayout),
        }
    }

    /// Resolve a document item or a sign block entity
    pub fn resolve_artifact<N: TreeNode>(
        &self,
        node: &N,
        sink: &mut dyn WarningSink,
    ) -> Option<RawArtifactFields> {
        if !node.is_compound() {
            return None;
        }
        let id = node_id(node)?;
        if is_sign_id(&id) {
            return self.signage_fields(node, id);
        }
        self.document_fields(node, sink)
    }

    /// Signs try this layout's face encoding first, then the other one;
    /// sign faces changed shape at a different version than item data.
    fn signage_fields<N: TreeNode>(&self, node: &N, id: String) -> Option<RawArtifactFields> {
        let faces = self
            .sign_faces(node)
            .or_else(|| self.other().sign_faces(node))?;
        let pages = text::faces_to_pages(faces)?;
        Some(RawArtifactFields::signage(Some(id), pages))
    }
}

impl FieldLayout for Layout {
    fn generation(&self) -> SchemaGeneration {
        match self {
            Layout::Legacy(l) => l.generation(),
            Layout::Modern(m) => m.generation(),
        }
    }

    fn document_fields<N: TreeNode>(
        &self,
        item: &N,
        sink: &mut dyn WarningSink,
    ) -> Option<RawArtifactFields> {
        match self {
            Layout::Legacy(l) => l.document_fields(item, sink),
            Layout::Modern(m) => m.document_fields(item, sink),
        }
    }

    fn item_count<N: TreeNode>(&self, item: &N) -> u32 {
        match self {
            Layout::Legacy(l) => l.item_count(item),
            Layout::Modern(m) => m.item_count(item),
        }
    }

    fn item_container_slots<'n, N: TreeNode>(
        &self,
        item: &'n N,
        kind: ContainerKind,
    ) -> Option<Vec<(SlotIndex, &'n N)>> {
        match self {
            Layout::Legacy(l) => l.item_container_slots(item, kind),
            Layout::Modern(m) => m.item_container_slots(item, kind),
        }
    }

    fn sign_faces<N: TreeNode>(&self, block_entity: &N) -> Option<Vec<Vec<String>>> {
        match self {
            Layout::Legacy(l) => l.sign_faces(block_entity),
            Layout::Modern(m) => m.sign_faces(block_entity),
        }
    }
}

/// Resolve an artifact from a node under the given generation
pub fn resolve_artifact<N: TreeNode>(
    node: &N,
    generation: SchemaGeneration,
    sink: &mut dyn WarningSink,
) -> Option<RawArtifactFields> {
    Layout::for_generation(generation).resolve_artifact(node, sink)
}

/// Sign and hanging-sign block entity identifiers
pub fn is_sign_id(id: &str) -> bool {
    id == "sign" || id == "hanging_sign" || id.ends_with("_sign")
}

/// `Some(writable)` for book identifiers, `None` for anything else
pub(crate) fn document_kind_for(id: &str) -> Option<bool> {
    match id {
        "written_book" => Some(false),
        "writable_book" => Some(true),
        _ => None,
    }
}

/// Absent precedence is canonical; out-of-range values are clamped to
/// canonical with a warning.
pub(crate) fn resolve_precedence(
    raw: Option<i64>,
    item_id: &str,
    sink: &mut dyn WarningSink,
) -> u8 {
    match raw {
        None => CANONICAL_PRECEDENCE,
        Some(value) if (0..=i64::from(MAX_PRECEDENCE)).contains(&value) => value as u8,
        Some(value) => {
            sink.warn(format!(
                "precedence {} out of range 0-{} on {}; treating as canonical",
                value, MAX_PRECEDENCE, item_id
            ));
            CANONICAL_PRECEDENCE
        }
    }
}
