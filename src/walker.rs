//! Container Walker
//!
//! Enumerates item slots below a root node, recursing through nested
//! containers, and yields every textual artifact it finds. Traversal uses an
//! explicit worklist with a depth counter carried per entry, so pathological
//! nesting is capped without touching the call stack.
//!
//! The walker never mutates the tree: walking the same root twice yields the
//! same sequence.

use crate::artifact::{Artifact, ArtifactFound};
use crate::schema::container::{node_id, resolve_container, ContainerKind};
use crate::schema::legacy::slotted_items;
use crate::schema::{FieldLayout, Layout, SchemaGeneration};
use crate::tree::TreeNode;
use crate::types::{SlotIndex, DEFAULT_MAX_DEPTH};
use crate::warnings::WarningSink;
use std::fmt;
use tracing::debug;

/// Keys under which chunk, region and entity data keep further holders
const HOLDER_KEYS: [&str; 6] = [
    "Level",
    "block_entities",
    "TileEntities",
    "Entities",
    "entities",
    "Passengers",
];

/// Position of an item inside its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    /// Element of a slot list
    Indexed { list: &'static str, index: SlotIndex },
    /// Dedicated single-item field
    Single(&'static str),
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Indexed { list: "Items", index } => write!(f, "slot {}", index),
            SlotRef::Indexed { list, index } => write!(f, "{} slot {}", list, index),
            SlotRef::Single(key) => write!(f, "{}", key),
        }
    }
}

/// Traversal-time view of one opened container
#[derive(Debug)]
pub struct ContainerNode<'n, N: TreeNode> {
    pub container_kind: ContainerKind,
    pub slot_items: Vec<(SlotRef, &'n N)>,
    pub nesting_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Chunk data, block entities, entities, player data
    Holder,
    /// An item sitting in a slot
    Item,
}

struct WorkItem<'n, N> {
    node: &'n N,
    location: String,
    depth: usize,
    role: Role,
}

/// Lazy artifact iterator over one root
pub struct ContainerWalker<'n, 'w, N: TreeNode> {
    layout: Layout,
    max_depth: usize,
    stack: Vec<WorkItem<'n, N>>,
    sink: &'w mut dyn WarningSink,
    visited: usize,
}

/// Walk `root` starting at `depth`, labelling provenance with `location`
pub fn walk<'n, 'w, N: TreeNode>(
    root: &'n N,
    generation: SchemaGeneration,
    location: impl Into<String>,
    depth: usize,
    sink: &'w mut dyn WarningSink,
) -> ContainerWalker<'n, 'w, N> {
    ContainerWalker::new(root, generation, location, sink).starting_at(depth)
}

impl<'n, 'w, N: TreeNode> ContainerWalker<'n, 'w, N> {
    pub fn new(
        root: &'n N,
        generation: SchemaGeneration,
        location: impl Into<String>,
        sink: &'w mut dyn WarningSink,
    ) -> Self {
        Self {
            layout: Layout::for_generation(generation),
            max_depth: DEFAULT_MAX_DEPTH,
            stack: vec![WorkItem {
                node: root,
                location: location.into(),
                depth: 0,
                role: Role::Holder,
            }],
            sink,
            visited: 0,
        }
    }

    /// Override the nesting ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn starting_at(mut self, depth: usize) -> Self {
        for item in &mut self.stack {
            item.depth = depth;
        }
        self
    }

    /// Nodes expanded so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Open a container node: the slots it holds in its placed form or its item form
    pub fn open_container(
        &self,
        node: &'n N,
        kind: ContainerKind,
        as_item: bool,
        depth: usize,
    ) -> Option<ContainerNode<'n, N>> {
        let mut slot_items = Vec::new();
        if !as_item {
            for &key in kind.placed_slot_keys() {
                let Some(child) = node.get_child(key) else {
                    continue;
                };
                if kind.is_single_slot() {
                    if child.is_compound() {
                        slot_items.push((SlotRef::Single(key), child));
                    }
                } else if let Some(items) = slotted_items(child) {
                    slot_items.extend(
                        items
                            .into_iter()
                            .map(|(index, item)| (SlotRef::Indexed { list: key, index }, item)),
                    );
                }
            }
        }
        if slot_items.is_empty() && kind.may_nest() {
            if let Some(items) = self.layout.item_container_slots(node, kind) {
                slot_items.extend(
                    items
                        .into_iter()
                        .map(|(index, item)| (SlotRef::Indexed { list: "Items", index }, item)),
                );
            }
        }
        if slot_items.is_empty() {
            return None;
        }
        Some(ContainerNode {
            container_kind: kind,
            slot_items,
            nesting_depth: depth,
        })
    }

    /// Push children in reverse so they pop in document order.
    /// Children past the ceiling are dropped with a warning.
    fn push_children(&mut self, parent_location: &str, depth: usize, children: Vec<WorkItem<'n, N>>) {
        if children.is_empty() {
            return;
        }
        if depth + 1 > self.max_depth {
            self.sink.warn(format!(
                "nesting ceiling {} exceeded at {}; skipping {} nested entries",
                self.max_depth,
                parent_location,
                children.len()
            ));
            return;
        }
        self.stack.extend(children.into_iter().rev());
    }

    fn emit(&mut self, node: &'n N, location: String, depth: usize) -> Option<ArtifactFound> {
        let fields = self.layout.resolve_artifact(node, &mut *self.sink)?;
        Some(ArtifactFound {
            artifact: Artifact::from_fields(fields, location),
            depth,
        })
    }

    fn expand(&mut self, work: WorkItem<'n, N>) -> Option<ArtifactFound> {
        self.visited += 1;
        let WorkItem {
            node,
            location,
            depth,
            role,
        } = work;

        if node.is_list() {
            let children = node
                .elements()
                .into_iter()
                .map(|child| WorkItem {
                    node: child,
                    location: location.clone(),
                    depth: depth + 1,
                    role,
                })
                .collect();
            self.push_children(&location, depth, children);
            return None;
        }
        if !node.is_compound() {
            return None;
        }

        match role {
            Role::Item => match resolve_container(node).filter(|k| k.may_nest()) {
                Some(kind) => {
                    let label = node_id(node).unwrap_or_else(|| "container".to_string());
                    let here = join(&location, &label);
                    if let Some(container) = self.open_container(node, kind, true, depth) {
                        let children = slot_children(&here, container);
                        self.push_children(&here, depth, children);
                    }
                    None
                }
                None => self.emit(node, location, depth),
            },
            Role::Holder => {
                let here = join(&location, &describe_holder(node));
                let mut children = Vec::new();
                match resolve_container(node) {
                    Some(kind) => {
                        debug!(location = %here, kind = ?kind, "opening container");
                        if let Some(container) = self.open_container(node, kind, false, depth) {
                            children = slot_children(&here, container);
                        }
                    }
                    None => {
                        if let Some(found) = self.emit(node, here, depth) {
                            return Some(found);
                        }
                    }
                }
                children.extend(holder_children(node, &location, depth));
                self.push_children(&location, depth, children);
                None
            }
        }
    }
}

impl<'n, 'w, N: TreeNode> Iterator for ContainerWalker<'n, 'w, N> {
    type Item = ArtifactFound;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(work) = self.stack.pop() {
            if let Some(found) = self.expand(work) {
                return Some(found);
            }
        }
        None
    }
}

fn slot_children<'n, N: TreeNode>(
    location: &str,
    container: ContainerNode<'n, N>,
) -> Vec<WorkItem<'n, N>> {
    let depth = container.nesting_depth;
    container
        .slot_items
        .into_iter()
        .map(|(slot, item)| WorkItem {
            node: item,
            location: join(location, &slot.to_string()),
            depth: depth + 1,
            role: Role::Item,
        })
        .collect()
}

fn holder_children<'n, N: TreeNode>(node: &'n N, location: &str, depth: usize) -> Vec<WorkItem<'n, N>> {
    HOLDER_KEYS
        .iter()
        .filter_map(|key| node.get_child(key))
        .map(|child| WorkItem {
            node: child,
            location: location.to_string(),
            depth: depth + 1,
            role: Role::Holder,
        })
        .collect()
}

fn join(location: &str, segment: &str) -> String {
    if location.is_empty() {
        segment.to_string()
    } else {
        format!("{} > {}", location, segment)
    }
}

/// `<id> at (x, y, z)` for block entities and entities
fn describe_holder<N: TreeNode>(node: &N) -> String {
    let name = node_id(node).unwrap_or_else(|| {
        if node.get_child("Inventory").is_some() {
            "player".to_string()
        } else {
            "data".to_string()
        }
    });
    match coordinates(node) {
        Some((x, y, z)) => format!("{} at ({}, {}, {})", name, x, y, z),
        None => name,
    }
}

fn coordinates<N: TreeNode>(node: &N) -> Option<(i64, i64, i64)> {
    let block = ["x", "y", "z"].map(|k| node.get_child(k).and_then(|v| v.as_int()));
    if let [Some(x), Some(y), Some(z)] = block {
        return Some((x, y, z));
    }
    let pos = node.get_child("Pos")?;
    let axis = |i: usize| pos.get_indexed(i).and_then(|v| v.as_float()).map(|v| v.floor() as i64);
    Some((axis(0)?, axis(1)?, axis(2)?))
}
