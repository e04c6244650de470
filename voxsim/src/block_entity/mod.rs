//! This module contains definition of block entities, stateful records attached to a
//! single block position.

use serde::{Serialize, Deserialize};

use crate::block;

pub mod chest;
pub mod sign;
pub mod jukebox;
pub mod brewing;


/// All kinds of block entities. The serialized form is tagged by a `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockEntity {
    Chest(chest::ChestBlockEntity),
    Sign(sign::SignBlockEntity),
    Crop(CropBlockEntity),
    Jukebox(jukebox::JukeboxBlockEntity),
    BrewingStand(brewing::BrewingStandBlockEntity),
}

/// Discriminant of [`BlockEntity`], used by the block registry to tell which blocks
/// require a block entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockEntityKind {
    Chest,
    Sign,
    Crop,
    Jukebox,
    BrewingStand,
}

impl BlockEntity {

    /// Create the default block entity of the given kind.
    pub fn new(kind: BlockEntityKind) -> Self {
        match kind {
            BlockEntityKind::Chest => Self::Chest(Default::default()),
            BlockEntityKind::Sign => Self::Sign(Default::default()),
            BlockEntityKind::Crop => Self::Crop(Default::default()),
            BlockEntityKind::Jukebox => Self::Jukebox(Default::default()),
            BlockEntityKind::BrewingStand => Self::BrewingStand(Default::default()),
        }
    }

    /// Get the kind of this block entity.
    pub fn kind(&self) -> BlockEntityKind {
        match self {
            Self::Chest(_) => BlockEntityKind::Chest,
            Self::Sign(_) => BlockEntityKind::Sign,
            Self::Crop(_) => BlockEntityKind::Crop,
            Self::Jukebox(_) => BlockEntityKind::Jukebox,
            Self::BrewingStand(_) => BlockEntityKind::BrewingStand,
        }
    }

}


/// Growth state of a crop block (wheat, carrots, potatoes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBlockEntity {
    /// Growth stage, from 0 to [`CropBlockEntity::MAX_STAGE`].
    pub stage: u8,
}

impl CropBlockEntity {

    pub const MAX_STAGE: u8 = 7;

    #[inline]
    pub fn is_grown(&self) -> bool {
        self.stage >= Self::MAX_STAGE
    }

}


/// An item stack stored in container block entities. Items share the id space of
/// blocks for block items, gameplay code is free to use ids above 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: u16,
    pub size: u8,
    #[serde(default)]
    pub damage: u16,
}

impl ItemStack {

    /// Create a new item stack of the given block.
    #[inline]
    pub fn new_block(id: u8, size: u8) -> Self {
        debug_assert!(!block::name(id).is_empty());
        Self { id: id as u16, size, damage: 0 }
    }

    #[inline]
    pub fn new(id: u16, size: u8, damage: u16) -> Self {
        Self { id, size, damage }
    }

}
