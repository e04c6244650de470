//! Overworld terrain generation.

use glam::{IVec3, DVec2};

use crate::util::{JavaRandom, OctaveNoise};
use crate::world::World;
use crate::chunk::Chunk;
use crate::block;

use super::structure::Structure;
use super::vein::VeinGenerator;
use super::{ChunkGenerator, FeatureGenerator, CaveCarver};


/// Water level of the overworld, water fills every column up to this Y coordinate.
pub const SEA_LEVEL: i32 = 62;

/// Base height of the terrain.
const BASE_HEIGHT: f64 = 64.0;
/// Octaves of the height noise.
const HEIGHT_OCTAVES: usize = 4;
/// Number of columns sampled for trees and cactus when populating a chunk.
const VEGETATION_SAMPLES: u32 = 8;
/// Chance for a plains chunk to have a well or a house.
const STRUCTURE_CHANCE: f32 = 0.08;

/// Ore veins: block, vein size, attempts per chunk and exclusive maximum Y.
const ORES: [(u8, u8, u32, i32); 4] = [
    (block::COAL_ORE, 16, 20, 128),
    (block::IRON_ORE, 8, 20, 64),
    (block::GOLD_ORE, 8, 2, 32),
    (block::DIAMOND_ORE, 7, 1, 16),
];


/// Biomes of the overworld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Ocean,
    Beach,
    Plains,
    Forest,
    Desert,
    Snow,
}

impl Biome {

    /// Get the land biome for the given temperature and humidity.
    pub fn from_climate(temperature: f64, humidity: f64) -> Self {
        if temperature > 0.5 {
            if humidity < 0.0 { Self::Desert } else { Self::Forest }
        } else if temperature < -0.3 {
            Self::Snow
        } else if humidity > 0.2 {
            Self::Forest
        } else {
            Self::Plains
        }
    }

    /// The surface block of this biome.
    pub fn top_block(self) -> u8 {
        match self {
            Self::Ocean | Self::Beach | Self::Desert => block::SAND,
            Self::Plains | Self::Forest => block::GRASS,
            Self::Snow => block::SNOW,
        }
    }

    /// The blocks under the surface block.
    pub fn under_block(self) -> u8 {
        match self {
            Self::Ocean | Self::Beach | Self::Desert => block::SAND,
            Self::Plains | Self::Forest | Self::Snow => block::DIRT,
        }
    }

    /// Height added to the base terrain height.
    pub fn height_offset(self) -> i32 {
        match self {
            Self::Ocean => -4,
            Self::Beach | Self::Plains => 0,
            Self::Forest => 2,
            Self::Desert => 1,
            Self::Snow => 5,
        }
    }

    /// Chance for a sampled column to get a tree.
    pub fn tree_chance(self) -> f32 {
        match self {
            Self::Ocean | Self::Desert => 0.0,
            Self::Beach => 0.04,
            Self::Plains => 0.02,
            Self::Forest => 0.5,
            Self::Snow => 0.2,
        }
    }

    /// Chance for a sampled column to get a cactus.
    pub fn cactus_chance(self) -> f32 {
        match self {
            Self::Desert => 0.25,
            _ => 0.0,
        }
    }

}


/// A chunk generator for the overworld.
#[derive(Debug, Clone)]
pub struct OverworldGenerator {
    seed: i64,
    height_noise: OctaveNoise,
    detail_noise: OctaveNoise,
    temperature_noise: OctaveNoise,
    humidity_noise: OctaveNoise,
    carver: CaveCarver,
}

impl OverworldGenerator {

    pub fn new(seed: i64) -> Self {
        let mut rand = JavaRandom::new(seed);
        Self {
            seed,
            height_noise: OctaveNoise::new(&mut rand, HEIGHT_OCTAVES),
            detail_noise: OctaveNoise::new(&mut rand, 1),
            temperature_noise: OctaveNoise::new(&mut rand, 1),
            humidity_noise: OctaveNoise::new(&mut rand, 1),
            carver: CaveCarver::new(&mut rand),
        }
    }

    /// Get the land biome of the given column from its climate, ignoring height.
    pub fn get_climate_biome(&self, x: i32, z: i32) -> Biome {
        let pos = DVec2::new(x as f64, z as f64) / 200.0;
        let temperature = self.temperature_noise.gen_2d_point(pos);
        let humidity = self.humidity_noise.gen_2d_point(pos + 1000.0);
        Biome::from_climate(temperature, humidity)
    }

    /// Get the biome and the surface height of the given column.
    pub fn get_column(&self, x: i32, z: i32) -> (Biome, i32) {

        let pos = DVec2::new(x as f64, z as f64);
        let amplitude = ((1 << HEIGHT_OCTAVES) - 1) as f64;
        let noise = self.height_noise.gen_2d_point(pos / 64.0) / amplitude;
        let detail = self.detail_noise.gen_2d_point(pos / 10.0);
        let base = (BASE_HEIGHT + noise * 24.0 + detail * 2.0).floor() as i32;

        let biome = if base < SEA_LEVEL - 3 {
            Biome::Ocean
        } else if base <= SEA_LEVEL + 1 {
            Biome::Beach
        } else {
            self.get_climate_biome(x, z)
        };

        (biome, (base + biome.height_offset()).clamp(8, 120))

    }

    fn populate_ores(&self, origin: IVec3, world: &mut World, rand: &mut JavaRandom) {
        for (id, size, attempts, max_y) in ORES {
            let mut vein = VeinGenerator::new_ore(id, size);
            for _ in 0..attempts {
                let pos = origin + IVec3 {
                    x: rand.next_int_bounded(16),
                    y: rand.next_int_bounded(max_y),
                    z: rand.next_int_bounded(16),
                };
                vein.generate(world, pos, rand);
            }
        }
    }

    fn populate_structures(&self, origin: IVec3, world: &mut World, rand: &mut JavaRandom) {

        for _ in 0..VEGETATION_SAMPLES {

            let x = origin.x + rand.next_int_bounded(16);
            let z = origin.z + rand.next_int_bounded(16);
            let roll = rand.next_float();

            let Some(y) = world.get_highest_block_y(x, z) else { continue };
            let (biome, _) = self.get_column(x, z);

            let mut structure = if roll < biome.tree_chance() {
                Structure::Tree { spruce: biome == Biome::Snow }
            } else if roll < biome.tree_chance() + biome.cactus_chance() {
                Structure::Cactus
            } else {
                continue;
            };

            structure.generate(world, IVec3::new(x, y, z), rand);

        }

        let (center_biome, _) = self.get_column(origin.x + 8, origin.z + 8);
        if center_biome == Biome::Plains && rand.next_float() < STRUCTURE_CHANCE {
            let x = origin.x + 3 + rand.next_int_bounded(10);
            let z = origin.z + 3 + rand.next_int_bounded(10);
            let mut structure = rand.next_choice(&[Structure::Well, Structure::House]);
            if let Some(y) = world.get_highest_block_y(x, z) {
                structure.generate(world, IVec3::new(x, y, z), rand);
            }
        }

    }

}

impl ChunkGenerator for OverworldGenerator {

    fn generate(&self, cx: i32, cz: i32, chunk: &mut Chunk) {

        for x in 0..16 {
            for z in 0..16 {

                let (biome, height) = self.get_column(cx * 16 + x, cz * 16 + z);
                let frozen = self.get_climate_biome(cx * 16 + x, cz * 16 + z) == Biome::Snow;

                chunk.set_block(IVec3::new(x, 0, z), block::BEDROCK, 0);
                chunk.fill_block(IVec3::new(x, 1, z), IVec3::new(1, height - 1, 1), block::STONE, 0);
                chunk.fill_block(IVec3::new(x, height - 3, z), IVec3::new(1, 3, 1), biome.under_block(), 0);
                chunk.set_block(IVec3::new(x, height, z), biome.top_block(), 0);

                for y in height + 1..=SEA_LEVEL {
                    let id = if frozen && y == SEA_LEVEL { block::ICE } else { block::WATER };
                    chunk.set_block(IVec3::new(x, y, z), id, 0);
                }

                // Keep a few layers under oceans so that caves don't flood.
                let max_y = if height < SEA_LEVEL { height - 4 } else { height - 1 };
                self.carver.carve_column(cx, cz, x, z, max_y, chunk);

            }
        }

    }

    fn populate(&self, cx: i32, cz: i32, world: &mut World) {
        let mut rand = JavaRandom::new_chunk(self.seed, cx, cz);
        let origin = IVec3::new(cx * 16, 0, cz * 16);
        self.populate_ores(origin, world, &mut rand);
        self.populate_structures(origin, world, &mut rand);
    }

}


#[cfg(test)]
mod tests {

    use std::sync::Arc;

    use crate::block::BlockRegistry;
    use crate::world::WorldConfig;

    use super::*;

    #[test]
    fn climate() {
        assert_eq!(Biome::from_climate(0.7, -0.1), Biome::Desert);
        assert_eq!(Biome::from_climate(0.7, 0.1), Biome::Forest);
        assert_eq!(Biome::from_climate(-0.5, 0.9), Biome::Snow);
        assert_eq!(Biome::from_climate(0.0, 0.5), Biome::Forest);
        assert_eq!(Biome::from_climate(0.0, 0.0), Biome::Plains);
    }

    #[test]
    fn deterministic() {

        let a = OverworldGenerator::new(1234);
        let b = OverworldGenerator::new(1234);
        let c = OverworldGenerator::new(4321);

        let mut chunk_a = Chunk::new();
        let mut chunk_b = Chunk::new();
        let mut chunk_c = Chunk::new();
        a.generate(2, -3, &mut chunk_a);
        // Generating another chunk before must not change anything.
        b.generate(0, 0, &mut Chunk::new());
        b.generate(2, -3, &mut chunk_b);
        c.generate(2, -3, &mut chunk_c);

        assert_eq!(chunk_a.blocks(), chunk_b.blocks());
        assert_eq!(chunk_a.metadata(), chunk_b.metadata());
        assert_ne!(chunk_a.blocks(), chunk_c.blocks());

    }

    #[test]
    fn bedrock_and_sea_level() {

        let generator = OverworldGenerator::new(42);

        for (cx, cz) in [(0, 0), (-5, 7), (12, -9)] {

            let mut chunk = Chunk::new();
            generator.generate(cx, cz, &mut chunk);

            for x in 0..16 {
                for z in 0..16 {
                    assert_eq!(chunk.get_block(IVec3::new(x, 0, z)).0, block::BEDROCK);
                    let top = chunk.get_highest_block_y(IVec3::new(x, 0, z)).unwrap();
                    assert!(top >= SEA_LEVEL);
                    let (_, height) = generator.get_column(cx * 16 + x, cz * 16 + z);
                    if height < SEA_LEVEL {
                        let (id, _) = chunk.get_block(IVec3::new(x, SEA_LEVEL, z));
                        assert!(id == block::WATER || id == block::ICE);
                        assert_ne!(chunk.get_block(IVec3::new(x, height, z)).0, block::AIR);
                    }
                }
            }

        }

    }

    #[test]
    fn populated_world() {

        let mut world = World::new(Arc::new(BlockRegistry::standard()), WorldConfig {
            seed: 42,
            ..Default::default()
        });

        world.generate_chunks_in(-1, -1, 1, 1);
        assert_eq!(world.get_chunk_count(), 9);

        let mut ores = 0;
        for (_, chunk) in world.iter_chunks() {
            ores += chunk.blocks().iter().filter(|&&id| id == block::COAL_ORE || id == block::IRON_ORE).count();
        }
        assert!(ores > 0);

    }

}
