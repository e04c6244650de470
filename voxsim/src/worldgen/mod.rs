//! World generation module. Terrain is generated directly in a fresh chunk, only from
//! the seed and the chunk coordinates, so that it never depends on the generation
//! order. Structures are then populated through the world, so they can overflow in
//! neighbor chunks that are not generated yet.

use glam::IVec3;
use serde::{Serialize, Deserialize};

use crate::world::{World, Dimension};
use crate::util::JavaRandom;
use crate::chunk::Chunk;


// Feature generators.
pub mod vein;
pub mod structure;

// Chunks carvers.
mod cave;
pub use cave::CaveCarver;

// World generators.
mod overworld;
mod nether;
mod flat;
pub use overworld::{OverworldGenerator, Biome, SEA_LEVEL};
pub use nether::{NetherGenerator, LAVA_LEVEL};
pub use flat::FlatGenerator;


/// Terrain preset of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    /// The natural terrain of the dimension.
    #[default]
    Default,
    /// A flat terrain, without structures.
    Flat,
}


/// A trait common to all chunk generators.
pub trait ChunkGenerator {

    /// Generate the terrain of the given chunk, only from its coordinates.
    fn generate(&self, cx: i32, cz: i32, chunk: &mut Chunk);

    /// Populate the given chunk with structures, the chunk is already in the world.
    fn populate(&self, cx: i32, cz: i32, world: &mut World);

}

/// A trait for all feature generators, placed in the world when populating.
pub trait FeatureGenerator {

    /// Generate the feature at the given position in the world with given RNG.
    fn generate(&mut self, world: &mut World, pos: IVec3, rand: &mut JavaRandom) -> bool;

}


/// The terrain generator of a world, derived from its seed, dimension and terrain kind.
pub enum TerrainGenerator {
    Overworld(OverworldGenerator),
    Nether(NetherGenerator),
    Flat(FlatGenerator),
}

impl TerrainGenerator {

    pub fn new(seed: i64, dimension: Dimension, terrain: TerrainKind) -> Self {
        match (terrain, dimension) {
            (TerrainKind::Flat, _) => Self::Flat(FlatGenerator),
            (TerrainKind::Default, Dimension::Overworld) => Self::Overworld(OverworldGenerator::new(seed)),
            (TerrainKind::Default, Dimension::Nether) => Self::Nether(NetherGenerator::new(seed)),
        }
    }

    #[inline]
    fn inner(&self) -> &dyn ChunkGenerator {
        match self {
            Self::Overworld(generator) => generator,
            Self::Nether(generator) => generator,
            Self::Flat(generator) => generator,
        }
    }

    /// Generate the terrain of the given chunk.
    pub fn generate(&self, cx: i32, cz: i32, chunk: &mut Chunk) {
        self.inner().generate(cx, cz, chunk);
    }

    /// Populate the given chunk with structures.
    pub fn populate(&self, cx: i32, cz: i32, world: &mut World) {
        self.inner().populate(cx, cz, world);
    }

}
