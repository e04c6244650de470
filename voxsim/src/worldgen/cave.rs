//! Noise cave carving.

use glam::{IVec3, DVec3};

use crate::util::{JavaRandom, OctaveNoise};
use crate::chunk::Chunk;
use crate::block;


/// Number of octaves of the cave noise.
const OCTAVES: usize = 3;
/// Normalized noise value above which a cell is carved.
const THRESHOLD: f64 = 0.42;
/// Scale of the noise coordinates, caves are stretched horizontally.
const SCALE: DVec3 = DVec3::new(1.0 / 28.0, 1.0 / 16.0, 1.0 / 28.0);


/// A cave carver, carving air in a chunk where a 3D noise is above a threshold.
#[derive(Debug, Clone)]
pub struct CaveCarver {
    noise: OctaveNoise,
}

impl CaveCarver {

    pub fn new(rand: &mut JavaRandom) -> Self {
        Self {
            noise: OctaveNoise::new(rand, OCTAVES),
        }
    }

    /// Return true if the given world position is inside a cave.
    pub fn is_cave(&self, pos: IVec3) -> bool {
        // Each octave contributes twice the previous one.
        let amplitude = ((1 << OCTAVES) - 1) as f64;
        let value = self.noise.gen_3d_point(pos.as_dvec3() * SCALE) / amplitude;
        value > THRESHOLD
    }

    /// Carve the column at given local position from Y 1 (bedrock is never carved) up
    /// to the given exclusive Y coordinate. Liquids are never carved, return the
    /// number of carved blocks.
    pub fn carve_column(&self, cx: i32, cz: i32, x: i32, z: i32, max_y: i32, chunk: &mut Chunk) -> usize {

        let mut count = 0;
        for y in 1..max_y.min(127) {
            let local_pos = IVec3::new(x, y, z);
            let world_pos = IVec3::new(cx * 16 + x, y, cz * 16 + z);
            match chunk.get_block(local_pos).0 {
                block::AIR | block::BEDROCK | block::WATER | block::LAVA | block::ICE => continue,
                _ => {}
            }
            if self.is_cave(world_pos) {
                chunk.set_block(local_pos, block::AIR, 0);
                count += 1;
            }
        }

        count

    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn never_breaches_bedrock() {

        let carver = CaveCarver::new(&mut JavaRandom::new(99));
        let mut chunk = Chunk::new();
        chunk.fill_block(IVec3::ZERO, IVec3::new(16, 1, 16), block::BEDROCK, 0);
        chunk.fill_block(IVec3::new(0, 1, 0), IVec3::new(16, 80, 16), block::STONE, 0);

        let mut carved = 0;
        for x in 0..16 {
            for z in 0..16 {
                carved += carver.carve_column(0, 0, x, z, 81, &mut chunk);
                assert_eq!(chunk.get_block(IVec3::new(x, 0, z)).0, block::BEDROCK);
            }
        }

        let air = chunk.blocks()[..].iter().filter(|&&id| id == block::AIR).count();
        assert_eq!(air, 16 * 16 * 128 - 16 * 16 * 81 + carved);

    }

    #[test]
    fn deterministic() {
        let a = CaveCarver::new(&mut JavaRandom::new(5));
        let b = CaveCarver::new(&mut JavaRandom::new(5));
        for i in 0..200 {
            let pos = IVec3::new(i * 7 - 300, i % 120, i * -3);
            assert_eq!(a.is_cave(pos), b.is_cave(pos));
        }
    }

}
