//! Nether terrain generation.

use glam::{IVec3, DVec3};

use crate::util::{JavaRandom, OctaveNoise};
use crate::world::World;
use crate::chunk::Chunk;
use crate::block;

use super::structure::Structure;
use super::vein::VeinGenerator;
use super::{ChunkGenerator, FeatureGenerator};


/// Lava fills every cavity below this Y coordinate.
pub const LAVA_LEVEL: i32 = 32;

const OCTAVES: usize = 4;
/// Cells with a density below this value are netherrack.
const THRESHOLD: f64 = 0.0;
const SCALE: DVec3 = DVec3::new(1.0 / 48.0, 1.0 / 24.0, 1.0 / 48.0);
const GLOWSTONE_ATTEMPTS: u32 = 10;
const QUARTZ_ATTEMPTS: u32 = 16;


/// A chunk generator for the nether, a netherrack mass between a bedrock floor and
/// ceiling, with large cavities whose bottom is filled with lava.
#[derive(Debug, Clone)]
pub struct NetherGenerator {
    seed: i64,
    noise: OctaveNoise,
}

impl NetherGenerator {

    pub fn new(seed: i64) -> Self {
        let mut rand = JavaRandom::new(seed);
        Self {
            seed,
            noise: OctaveNoise::new(&mut rand, OCTAVES),
        }
    }

    /// Get the density at the given position, netherrack below the threshold. The
    /// density decreases near the floor and the ceiling so that they are closed.
    fn get_density(&self, pos: IVec3) -> f64 {
        let amplitude = ((1 << OCTAVES) - 1) as f64;
        let noise = self.noise.gen_3d_point(pos.as_dvec3() * SCALE) / amplitude;
        let edge = ((pos.y - 64).abs() as f64 / 64.0).powi(4);
        noise - edge
    }

}

impl ChunkGenerator for NetherGenerator {

    fn generate(&self, cx: i32, cz: i32, chunk: &mut Chunk) {

        for x in 0..16 {
            for z in 0..16 {

                chunk.set_block(IVec3::new(x, 0, z), block::BEDROCK, 0);
                chunk.set_block(IVec3::new(x, 127, z), block::BEDROCK, 0);

                for y in 1..127 {
                    let pos = IVec3::new(x, y, z);
                    let id = if self.get_density(IVec3::new(cx * 16 + x, y, cz * 16 + z)) < THRESHOLD {
                        block::NETHERRACK
                    } else if y < LAVA_LEVEL {
                        block::LAVA
                    } else {
                        continue;
                    };
                    chunk.set_block(pos, id, 0);
                }

            }
        }

    }

    fn populate(&self, cx: i32, cz: i32, world: &mut World) {

        let mut rand = JavaRandom::new_chunk(self.seed, cx, cz);
        let origin = IVec3::new(cx * 16, 0, cz * 16);

        let mut quartz = VeinGenerator::new_nether_ore(block::QUARTZ_ORE, 13);
        for _ in 0..QUARTZ_ATTEMPTS {
            let pos = origin + IVec3 {
                x: rand.next_int_bounded(16),
                y: 10 + rand.next_int_bounded(108),
                z: rand.next_int_bounded(16),
            };
            quartz.generate(world, pos, &mut rand);
        }

        for _ in 0..GLOWSTONE_ATTEMPTS {

            let x = origin.x + rand.next_int_bounded(16);
            let z = origin.z + rand.next_int_bounded(16);
            let start_y = LAVA_LEVEL + rand.next_int_bounded(120 - LAVA_LEVEL);

            // Find the first ceiling above the start position.
            for y in start_y..127 {
                let pos = IVec3::new(x, y, z);
                if Structure::Glowstone.can_place(world, pos) {
                    Structure::Glowstone.place(world, pos, &mut rand);
                    break;
                }
            }

        }

    }

}
