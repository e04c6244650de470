//! Flat terrain.

use glam::IVec3;

use crate::world::World;
use crate::chunk::{Chunk, CHUNK_WIDTH};
use crate::block;

use super::ChunkGenerator;


/// Height of the grass layer of flat worlds.
pub const FLAT_GROUND_Y: i32 = 4;

/// A generator of bedrock, three layers of dirt and grass on top.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGenerator;

impl ChunkGenerator for FlatGenerator {

    fn generate(&self, _cx: i32, _cz: i32, chunk: &mut Chunk) {
        let w = CHUNK_WIDTH as i32;
        chunk.fill_block(IVec3::ZERO, IVec3::new(w, 1, w), block::BEDROCK, 0);
        chunk.fill_block(IVec3::new(0, 1, 0), IVec3::new(w, FLAT_GROUND_Y - 1, w), block::DIRT, 0);
        chunk.fill_block(IVec3::new(0, FLAT_GROUND_Y, 0), IVec3::new(w, 1, w), block::GRASS, 0);
    }

    fn populate(&self, _cx: i32, _cz: i32, _world: &mut World) {}

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn layers() {
        let mut chunk = Chunk::new();
        FlatGenerator.generate(3, -2, &mut chunk);
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(chunk.get_block(IVec3::new(x, 0, z)).0, block::BEDROCK);
                assert_eq!(chunk.get_block(IVec3::new(x, 2, z)).0, block::DIRT);
                assert_eq!(chunk.get_highest_block_y(IVec3::new(x, 0, z)), Some(FLAT_GROUND_Y));
            }
        }
        assert_eq!(chunk.get_block(IVec3::new(0, FLAT_GROUND_Y, 0)).0, block::GRASS);
    }

}
