//! Chest block entity.

use serde::{Serialize, Deserialize};

use super::ItemStack;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestBlockEntity {
    /// The slots of the chest, empty slots are none.
    pub slots: Vec<Option<ItemStack>>,
}

impl ChestBlockEntity {

    /// Number of slots in a single chest.
    pub const SIZE: usize = 27;

    /// Insert the given stack in the first empty slot, returning the stack back if the
    /// chest is full.
    pub fn push(&mut self, stack: ItemStack) -> Result<usize, ItemStack> {
        match self.slots.iter_mut().enumerate().find(|(_, slot)| slot.is_none()) {
            Some((index, slot)) => {
                *slot = Some(stack);
                Ok(index)
            }
            None => Err(stack),
        }
    }

}

impl Default for ChestBlockEntity {
    fn default() -> Self {
        Self {
            slots: vec![None; Self::SIZE],
        }
    }
}
