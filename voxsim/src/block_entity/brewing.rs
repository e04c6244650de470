//! Brewing stand block entity.

use serde::{Serialize, Deserialize};

use super::ItemStack;


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewingStandBlockEntity {
    /// Ticks elapsed in the current brew, 0 when idle.
    pub brew_time: u16,
    /// The ingredient slot.
    pub ingredient: Option<ItemStack>,
    /// The three bottle slots.
    pub bottles: [Option<ItemStack>; 3],
}
