//! Modern layout: item data nested under namespaced components.
//!
//! List elements are wrapped one level deeper (`{raw: ..}` pages,
//! `{slot, item}` container entries) and the stack count lives under `count`.

use super::container::{node_id, ContainerKind};
use super::legacy::count_from;
use super::text::{filterable_text, text_value};
use super::{document_kind_for, resolve_precedence, FieldLayout, SchemaGeneration};
use crate::artifact::{ArtifactKind, RawArtifactFields};
use crate::tree::TreeNode;
use crate::types::SlotIndex;
use crate::warnings::WarningSink;

pub const WRITTEN_BOOK_CONTENT: &str = "minecraft:written_book_content";
pub const WRITABLE_BOOK_CONTENT: &str = "minecraft:writable_book_content";
pub const CONTAINER: &str = "minecraft:container";
pub const BUNDLE_CONTENTS: &str = "minecraft:bundle_contents";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModernLayout;

impl FieldLayout for ModernLayout {
    fn generation(&self) -> SchemaGeneration {
        SchemaGeneration::Modern
    }

    fn document_fields<N: TreeNode>(
        &self,
        item: &N,
        sink: &mut dyn WarningSink,
    ) -> Option<RawArtifactFields> {
        let id = node_id(item)?;
        let writable = document_kind_for(&id)?;
        let component_key = if writable {
            WRITABLE_BOOK_CONTENT
        } else {
            WRITTEN_BOOK_CONTENT
        };
        let content = item.get_path(&["components", component_key])?;
        if !content.is_compound() {
            return None;
        }

        let pages_node = content.get_child("pages")?;
        if !pages_node.is_list() {
            return None;
        }
        let pages = pages_node
            .elements()
            .into_iter()
            .map(filterable_text)
            .collect::<Option<Vec<String>>>()?;
        if pages.is_empty() {
            return None;
        }

        let (title, author, precedence) = if writable {
            (None, None, 0)
        } else {
            let title = content.get_child("title").and_then(filterable_text);
            let author = content
                .get_child("author")
                .and_then(text_value);
            let generation = match content.get_child("generation") {
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
        count_from(item.get_child("count"))
    }

    fn item_container_slots<'n, N: TreeNode>(
        &self,
        item: &'n N,
        kind: ContainerKind,
    ) -> Option<Vec<(SlotIndex, &'n N)>> {
        match kind {
            ContainerKind::ShulkerBox(_) => {
                let entries = item.get_path(&["components", CONTAINER])?;
                if !entries.is_list() {
                    return None;
                }
                Some(
                    entries
                        .elements()
                        .into_iter()
                        .enumerate()
                        .filter_map(|(i, entry)| {
                            let inner = entry.get_child("item")?;
                            let slot = entry
                                .get_child("slot")
                                .and_then(|s| s.as_int())
                                .unwrap_or(i as SlotIndex);
                            Some((slot, inner))
                        })
                        .collect(),
                )
            }
            ContainerKind::Bundle(_) => {
                let items = item.get_path(&["components", BUNDLE_CONTENTS])?;
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
        let front = face_lines(block_entity.get_child("front_text")?)?;
        let mut faces = vec![front];
        if let Some(back) = block_entity.get_child("back_text").and_then(face_lines) {
            faces.push(back);
        }
        Some(faces)
    }
}

fn face_lines<N: TreeNode>(face: &N) -> Option<Vec<String>> {
    let messages = face.get_child("messages")?;
    if !messages.is_list() {
        return None;
    }
    Some(
        messages
            .elements()
            .into_iter()
            .map(|line| filterable_text(line).unwrap_or_default())
            .collect(),
    )
}
