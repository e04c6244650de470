//! A chunk storing blocks, metadata, light and block entities of a 16x16x128 column.

use std::collections::HashMap;

use glam::IVec3;

use crate::block_entity::BlockEntity;
use crate::block;


/// Chunk size in both X and Z coordinates.
pub const CHUNK_WIDTH: usize = 16;
/// Chunk height.
pub const CHUNK_HEIGHT: usize = 128;
/// Internal chunk size, in number of elements per chunk.
pub const CHUNK_SIZE: usize = CHUNK_HEIGHT * CHUNK_WIDTH * CHUNK_WIDTH;


/// Calculate the index in the chunk's arrays for the given chunk-local position. The
/// layout is `_xxx xzzz zyyy yyyy`, so each column is contiguous. Only firsts relevant
/// bits are taken in each coordinate component.
#[inline]
pub fn calc_index(pos: IVec3) -> usize {
    debug_assert!(pos.y >= 0 && pos.y < CHUNK_HEIGHT as i32);
    let x = pos.x as u32 & 0b1111;
    let z = pos.z as u32 & 0b1111;
    let y = pos.y as u32 & 0b1111111;
    ((x << 11) | (z << 7) | y) as usize
}

/// Calculate the chunk-local position from an index in the chunk's arrays.
#[inline]
pub fn calc_local_pos(index: usize) -> IVec3 {
    IVec3 {
        x: ((index >> 11) & 0b1111) as i32,
        y: (index & 0b1111111) as i32,
        z: ((index >> 7) & 0b1111) as i32,
    }
}

/// Calculate the chunk position corresponding to the given block position. This returns
/// no position if the Y coordinate is invalid.
#[inline]
pub fn calc_chunk_pos(pos: IVec3) -> Option<(i32, i32)> {
    if pos.y < 0 || pos.y >= CHUNK_HEIGHT as i32 {
        None
    } else {
        Some(calc_chunk_pos_unchecked(pos))
    }
}

/// Calculate the chunk position corresponding to the given block position. The Y
/// coordinate is ignored, so it may be invalid.
#[inline]
pub fn calc_chunk_pos_unchecked(pos: IVec3) -> (i32, i32) {
    (pos.x >> 4, pos.z >> 4)
}


/// Data structure storing every chunk-local data, chunks are a world subdivision of
/// 16x16x128 blocks.
pub struct Chunk {
    /// The numeric identifier of the block.
    blocks: ChunkByteArray,
    /// One metadata byte for each block, its meaning depends on the block.
    metadata: ChunkByteArray,
    /// Light level for each block, from 0 to 15.
    light: ChunkByteArray,
    /// Block entities in this chunk, mapped to their absolute position in the world.
    block_entities: HashMap<IVec3, BlockEntity>,
    /// Set on every modification, cleared when the chunk is persisted.
    dirty: bool,
}

impl Chunk {

    /// Create a new empty chunk, full of air blocks and without light.
    pub fn new() -> Box<Self> {
        Box::new(Self {
            blocks: [block::AIR; CHUNK_SIZE],
            metadata: [0; CHUNK_SIZE],
            light: [0; CHUNK_SIZE],
            block_entities: HashMap::new(),
            dirty: false,
        })
    }

    /// Create a chunk from its raw arrays, the arrays must all have the chunk size.
    pub fn from_arrays(blocks: &[u8], metadata: &[u8], light: &[u8]) -> Option<Box<Self>> {
        if blocks.len() != CHUNK_SIZE || metadata.len() != CHUNK_SIZE || light.len() != CHUNK_SIZE {
            return None;
        }
        let mut chunk = Self::new();
        chunk.blocks.copy_from_slice(blocks);
        chunk.metadata.copy_from_slice(metadata);
        chunk.light.copy_from_slice(light);
        Some(chunk)
    }

    /// Get block id and metadata at the given global position (rebased to chunk-local).
    /// Panics if Y component of the position is not between 0 and 128 (excluded).
    #[inline]
    pub fn get_block(&self, pos: IVec3) -> (u8, u8) {
        let index = calc_index(pos);
        (self.blocks[index], self.metadata[index])
    }

    /// Set block id and metadata at the given global position (rebased to chunk-local).
    /// Panics if Y component of the position is not between 0 and 128 (excluded).
    #[inline]
    pub fn set_block(&mut self, pos: IVec3, id: u8, metadata: u8) {
        let index = calc_index(pos);
        self.blocks[index] = id;
        self.metadata[index] = metadata;
        self.dirty = true;
    }

    /// Get block metadata at the given global position (rebased to chunk-local).
    #[inline]
    pub fn get_metadata(&self, pos: IVec3) -> u8 {
        self.metadata[calc_index(pos)]
    }

    /// Set block metadata at the given global position (rebased to chunk-local).
    #[inline]
    pub fn set_metadata(&mut self, pos: IVec3, metadata: u8) {
        self.metadata[calc_index(pos)] = metadata;
        self.dirty = true;
    }

    /// Get light level at the given global position (rebased to chunk-local).
    #[inline]
    pub fn get_light(&self, pos: IVec3) -> u8 {
        self.light[calc_index(pos)]
    }

    /// Set light level at the given global position (rebased to chunk-local).
    #[inline]
    pub fn set_light(&mut self, pos: IVec3, level: u8) {
        debug_assert!(level <= 15);
        self.light[calc_index(pos)] = level;
        self.dirty = true;
    }

    /// Get the Y coordinate of the highest non-air block in the column of the given
    /// position, the Y component of the position is ignored.
    pub fn get_highest_block_y(&self, pos: IVec3) -> Option<i32> {
        let bottom = calc_index(pos.with_y(0));
        self.blocks[bottom..bottom + CHUNK_HEIGHT].iter()
            .rposition(|&id| id != block::AIR)
            .map(|y| y as i32)
    }

    /// Fill the given chunk area with given block id and metadata.
    /// Panics if Y component of the position is not between 0 and 128 (excluded).
    pub fn fill_block(&mut self, start: IVec3, size: IVec3, id: u8, metadata: u8) {

        for x in start.x..start.x + size.x {
            for z in start.z..start.z + size.z {
                let mut index = calc_index(IVec3::new(x, start.y, z));
                for _ in start.y..start.y + size.y {
                    self.blocks[index] = id;
                    self.metadata[index] = metadata;
                    // Increment Y component.
                    index += 1;
                }
            }
        }

        self.dirty = true;

    }

    /// Raw block ids array, in chunk index order.
    #[inline]
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    /// Raw metadata array, in chunk index order.
    #[inline]
    pub fn metadata(&self) -> &[u8] {
        &self.metadata
    }

    /// Raw light array, in chunk index order.
    #[inline]
    pub fn light(&self) -> &[u8] {
        &self.light
    }

    #[inline]
    pub fn get_block_entity(&self, pos: IVec3) -> Option<&BlockEntity> {
        self.block_entities.get(&pos)
    }

    #[inline]
    pub fn get_block_entity_mut(&mut self, pos: IVec3) -> Option<&mut BlockEntity> {
        self.dirty = true;
        self.block_entities.get_mut(&pos)
    }

    /// Set the block entity at the given global position, returning the previous one.
    #[inline]
    pub fn set_block_entity(&mut self, pos: IVec3, block_entity: BlockEntity) -> Option<BlockEntity> {
        self.dirty = true;
        self.block_entities.insert(pos, block_entity)
    }

    #[inline]
    pub fn remove_block_entity(&mut self, pos: IVec3) -> Option<BlockEntity> {
        let prev = self.block_entities.remove(&pos);
        self.dirty |= prev.is_some();
        prev
    }

    /// Iterate over all block entities of this chunk, with their global position.
    #[inline]
    pub fn iter_block_entities(&self) -> impl Iterator<Item = (IVec3, &BlockEntity)> + '_ {
        self.block_entities.iter().map(|(&pos, entity)| (pos, entity))
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

}

/// Type alias for a chunk array that stores `u8 * CHUNK_SIZE` values.
type ChunkByteArray = [u8; CHUNK_SIZE];


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn index_layout() {
        assert_eq!(calc_index(IVec3::new(0, 0, 0)), 0);
        assert_eq!(calc_index(IVec3::new(0, 1, 0)), 1);
        assert_eq!(calc_index(IVec3::new(0, 0, 1)), 128);
        assert_eq!(calc_index(IVec3::new(1, 0, 0)), 2048);
        // Global positions are rebased.
        assert_eq!(calc_index(IVec3::new(-1, 5, -16)), calc_index(IVec3::new(15, 5, 0)));
        for index in [0, 1, 127, 128, 2047, 2048, CHUNK_SIZE - 1] {
            assert_eq!(calc_index(calc_local_pos(index)), index);
        }
    }

    #[test]
    fn chunk_pos() {
        assert_eq!(calc_chunk_pos(IVec3::new(0, 0, 0)), Some((0, 0)));
        assert_eq!(calc_chunk_pos(IVec3::new(-1, 0, 16)), Some((-1, 1)));
        assert_eq!(calc_chunk_pos(IVec3::new(-16, 127, -17)), Some((-1, -2)));
        assert_eq!(calc_chunk_pos(IVec3::new(0, 128, 0)), None);
        assert_eq!(calc_chunk_pos(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn highest_block() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.get_highest_block_y(IVec3::new(3, 0, 4)), None);
        chunk.fill_block(IVec3::new(0, 0, 0), IVec3::new(16, 10, 16), block::STONE, 0);
        chunk.set_block(IVec3::new(3, 60, 4), block::GLASS, 0);
        assert_eq!(chunk.get_highest_block_y(IVec3::new(3, 100, 4)), Some(60));
        assert_eq!(chunk.get_highest_block_y(IVec3::new(5, 0, 5)), Some(9));
        assert!(chunk.is_dirty());
    }

}
