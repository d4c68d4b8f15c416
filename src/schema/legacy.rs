//! Legacy layout: flat fields directly under an item's `tag` side table.

use super::container::{node_id, ContainerKind};
use super::text::text_value;
use super::{document_kind_for, resolve_precedence, FieldLayout, SchemaGeneration};
use crate::artifact::{ArtifactKind, RawArtifactFields};
use crate::tree::TreeNode;
use crate::types::{SlotIndex, LINES_PER_FACE};
use crate::warnings::WarningSink;

/// `Text1`..`Text4` line keys
const SIGN_LINE_KEYS: [&str; LINES_PER_FACE] = ["Text1", "Text2", "Text3", "Text4"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyLayout;

impl FieldLayout for LegacyLayout {
    fn generation(&self) -> SchemaGeneration {
        SchemaGeneration::Legacy
    }

    fn document_fields<N: TreeNode>(
        &self,
        item: &N,
        sink: &mut dyn WarningSink,
    ) -> Option<RawArtifactFields> {
        let id = node_id(item)?;
        let writable = document_kind_for(&id)?;
        let tag = item.get_child("tag")?;
        if !tag.is_compound() {
            return None;
        }

        let pages_node = tag.get_child("pages")?;
        if !pages_node.is_list() {
            return None;
        }
        let pages = pages_node
            .elements()
            .into_iter()
            .map(|page| page.as_string().map(str::to_string))
            .collect::<Option<Vec<String>>>()?;
        if pages.is_empty() {
            return None;
        }

        let (title, author, precedence) = if writable {
            (None, None, 0)
        } else {
            let title = tag.get_child("title").and_then(text_value);
            let author = tag.get_child("author").and_then(|a| a.as_string()).map(str::to_string);
            let generation = match tag.get_child("generation") {
                Some(node) => Some(node.as_int()?),
                None => None,
            };
            (title, author, resolve_precedence(generation, &id, sink))
        };

        Some(RawArtifactFields {
            kind: ArtifactKind::MultiPageDocument,
            item_id: Some(id),
            item_count: self.item_count(item),
            title,
            author,
            precedence,
            pages,
        })
    }

    fn item_count<N: TreeNode>(&self, item: &N) -> u32 {
        count_from(item.get_child("Count"))
    }

    fn item_container_slots<'n, N: TreeNode>(
        &self,
        item: &'n N,
        kind: ContainerKind,
    ) -> Option<Vec<(SlotIndex, &'n N)>> {
        match kind {
            ContainerKind::ShulkerBox(_) => {
                let items = item.get_path(&["tag", "BlockEntityTag", "Items"])?;
                slotted_items(items)
            }
            ContainerKind::Bundle(_) => {
                let items = item.get_path(&["tag", "Items"])?;
                if !items.is_list() {
                    return None;
                }
                Some(
                    items
                        .elements()
                        .into_iter()
                        .enumerate()
                        .map(|(i, node)| (i as SlotIndex, node))
                        .collect(),
                )
            }
            _ => None,
        }
    }

    fn sign_faces<N: TreeNode>(&self, block_entity: &N) -> Option<Vec<Vec<String>>> {
        if !SIGN_LINE_KEYS.iter().any(|key| block_entity.get_child(key).is_some()) {
            return None;
        }
        let front = SIGN_LINE_KEYS
            .iter()
            .map(|key| {
                block_entity
                    .get_child(key)
                    .and_then(text_value)
                    .unwrap_or_default()
            })
            .collect();
        Some(vec![front])
    }
}

/// Item list whose elements carry their own `Slot`
pub(crate) fn slotted_items<N: TreeNode>(items: &N) -> Option<Vec<(SlotIndex, &N)>> {
    if !items.is_list() {
        return None;
    }
    Some(
        items
            .elements()
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                let slot = node
                    .get_child("Slot")
                    .and_then(|s| s.as_int())
                    .unwrap_or(i as SlotIndex);
                (slot, node)
            })
            .collect(),
    )
}

pub(crate) fn count_from<N: TreeNode>(node: Option<&N>) -> u32 {
    node.and_then(|n| n.as_int())
        .and_then(|c| u32::try_from(c).ok())
        .filter(|c| *c > 0)
        .unwrap_or(1)
}
