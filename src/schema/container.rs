//! Container classification.
//!
//! Containers are recognised by identifier against a closed set. Only
//! box-like and stack-like kinds may hold further containers.

use crate::tree::TreeNode;
use serde::{Deserialize, Serialize};

/// The sixteen dye colours used by coloured container variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DyeColour {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl DyeColour {
    pub const ALL: [DyeColour; 16] = [
        DyeColour::White,
        DyeColour::Orange,
        DyeColour::Magenta,
        DyeColour::LightBlue,
        DyeColour::Yellow,
        DyeColour::Lime,
        DyeColour::Pink,
        DyeColour::Gray,
        DyeColour::LightGray,
        DyeColour::Cyan,
        DyeColour::Purple,
        DyeColour::Blue,
        DyeColour::Brown,
        DyeColour::Green,
        DyeColour::Red,
        DyeColour::Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DyeColour::White => "white",
            DyeColour::Orange => "orange",
            DyeColour::Magenta => "magenta",
            DyeColour::LightBlue => "light_blue",
            DyeColour::Yellow => "yellow",
            DyeColour::Lime => "lime",
            DyeColour::Pink => "pink",
            DyeColour::Gray => "gray",
            DyeColour::LightGray => "light_gray",
            DyeColour::Cyan => "cyan",
            DyeColour::Purple => "purple",
            DyeColour::Blue => "blue",
            DyeColour::Brown => "brown",
            DyeColour::Green => "green",
            DyeColour::Red => "red",
            DyeColour::Black => "black",
        }
    }

    /// Split `<colour>_<base>` into its colour, if `base` matches
    fn strip(id: &str, base: &str) -> Option<Option<DyeColour>> {
        if id == base {
            return Some(None);
        }
        let prefix = id.strip_suffix(base)?.strip_suffix('_')?;
        DyeColour::ALL
            .iter()
            .find(|c| c.as_str() == prefix)
            .map(|c| Some(*c))
    }
}

/// Multi-slot storage that keeps its items under `Items`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChestKind {
    Chest,
    TrappedChest,
    Barrel,
    Hopper,
    Dispenser,
    Dropper,
    ChiseledBookshelf,
    Crafter,
    ChestMinecart,
    HopperMinecart,
    ChestBoat,
    PackAnimal,
}

/// Single-slot holders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayKind {
    ItemFrame,
    GlowItemFrame,
    DroppedItem,
    Lectern,
    DecoratedPot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    Chest(ChestKind),
    /// Player data and mobs with a personal inventory
    Inventory,
    ShulkerBox(Option<DyeColour>),
    Bundle(Option<DyeColour>),
    Display(DisplayKind),
}

impl ContainerKind {
    /// Classify a normalised identifier
    pub fn from_id(id: &str) -> Option<ContainerKind> {
        let kind = match id {
            "chest" => ContainerKind::Chest(ChestKind::Chest),
            "trapped_chest" => ContainerKind::Chest(ChestKind::TrappedChest),
            "barrel" => ContainerKind::Chest(ChestKind::Barrel),
            "hopper" => ContainerKind::Chest(ChestKind::Hopper),
            "dispenser" => ContainerKind::Chest(ChestKind::Dispenser),
            "dropper" => ContainerKind::Chest(ChestKind::Dropper),
            "chiseled_bookshelf" => ContainerKind::Chest(ChestKind::ChiseledBookshelf),
            "crafter" => ContainerKind::Chest(ChestKind::Crafter),
            "chest_minecart" => ContainerKind::Chest(ChestKind::ChestMinecart),
            "hopper_minecart" => ContainerKind::Chest(ChestKind::HopperMinecart),
            "donkey" | "mule" | "llama" | "trader_llama" => {
                ContainerKind::Chest(ChestKind::PackAnimal)
            }
            "villager" | "piglin" | "pillager" | "allay" => ContainerKind::Inventory,
            "item_frame" => ContainerKind::Display(DisplayKind::ItemFrame),
            "glow_item_frame" => ContainerKind::Display(DisplayKind::GlowItemFrame),
            "item" => ContainerKind::Display(DisplayKind::DroppedItem),
            "lectern" => ContainerKind::Display(DisplayKind::Lectern),
            "decorated_pot" => ContainerKind::Display(DisplayKind::DecoratedPot),
            other => {
                if other == "chest_boat"
                    || other.ends_with("_chest_boat")
                    || other.ends_with("_chest_raft")
                {
                    ContainerKind::Chest(ChestKind::ChestBoat)
                } else if let Some(colour) = DyeColour::strip(other, "shulker_box") {
                    ContainerKind::ShulkerBox(colour)
                } else if let Some(colour) = DyeColour::strip(other, "bundle") {
                    ContainerKind::Bundle(colour)
                } else {
                    return None;
                }
            }
        };
        Some(kind)
    }

    /// Whether this kind may itself be found inside another container and be walked
    pub fn may_nest(&self) -> bool {
        matches!(self, ContainerKind::ShulkerBox(_) | ContainerKind::Bundle(_))
    }

    /// Single-slot kinds keep one item under a dedicated key instead of a list
    pub fn is_single_slot(&self) -> bool {
        matches!(self, ContainerKind::Display(_))
    }

    /// Keys holding items when the container is a placed block or an entity
    pub fn placed_slot_keys(&self) -> &'static [&'static str] {
        match self {
            ContainerKind::Chest(_) | ContainerKind::ShulkerBox(_) | ContainerKind::Bundle(_) => {
                &["Items"]
            }
            ContainerKind::Inventory => &["Inventory", "EnderItems"],
            ContainerKind::Display(DisplayKind::Lectern) => &["Book"],
            ContainerKind::Display(DisplayKind::DecoratedPot) => &["item"],
            ContainerKind::Display(_) => &["Item"],
        }
    }
}

/// Normalise an identifier: drop the `minecraft:` namespace, lowercase
pub fn normalize_id(id: &str) -> String {
    let trimmed = id.trim();
    let bare = trimmed.strip_prefix("minecraft:").unwrap_or(trimmed);
    bare.to_ascii_lowercase()
}

/// Normalised `id` of a compound, if present
pub fn node_id<N: TreeNode>(node: &N) -> Option<String> {
    node.get_child("id")
        .and_then(|id| id.as_string())
        .map(normalize_id)
}

/// Classify an item or placed holder by identifier.
///
/// A compound without an identifier that carries an `Inventory` or
/// `EnderItems` list is player data.
pub fn resolve_container<N: TreeNode>(item: &N) -> Option<ContainerKind> {
    if !item.is_compound() {
        return None;
    }
    match node_id(item) {
        Some(id) => ContainerKind::from_id(&id),
        None => {
            let has_inventory = ["Inventory", "EnderItems"]
                .iter()
                .any(|key| item.get_child(key).map(|n| n.is_list()).unwrap_or(false));
            has_inventory.then_some(ContainerKind::Inventory)
        }
    }
}
