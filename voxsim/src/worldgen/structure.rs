//! Structures placed when populating chunks. Every block is placed through the world,
//! so structures overflowing in a chunk that is not yet generated are kept as pending
//! writes of that chunk.

use glam::IVec3;

use crate::block::{self, torch};
use crate::util::{JavaRandom, Face};
use crate::world::World;

use super::FeatureGenerator;


/// A structure, placed relative to a ground position. The ground position is the
/// surface block on which the structure stands, or the ceiling block for glowstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// An oak or spruce tree standing on grass, dirt or snow.
    Tree {
        spruce: bool,
    },
    /// A cactus standing on sand.
    Cactus,
    /// A water well dug in grass.
    Well,
    /// A small cobblestone house with a chest and a torch, standing on grass.
    House,
    /// A glowstone cluster hanging from a netherrack ceiling.
    Glowstone,
}

impl Structure {

    /// Return true if this structure can be placed on the given ground position.
    pub fn can_place(self, world: &World, ground: IVec3) -> bool {
        let above = ground + IVec3::Y;
        match self {
            Self::Tree { .. } => {
                matches!(world.get_block(ground), block::GRASS | block::DIRT | block::SNOW)
                    && world.is_block(above, block::AIR)
            }
            Self::Cactus => {
                world.is_block(ground, block::SAND)
                    && world.is_block(above, block::AIR)
                    && Face::HORIZONTAL.into_iter().all(|face| world.is_block(above + face.delta(), block::AIR))
            }
            Self::Well | Self::House => {
                world.is_block(ground, block::GRASS) && world.is_block(above, block::AIR)
            }
            Self::Glowstone => {
                world.is_block(ground, block::NETHERRACK) && world.is_block(ground - IVec3::Y, block::AIR)
            }
        }
    }

    /// Place this structure on the given ground position, without checking if it can be
    /// placed.
    pub fn place(self, world: &mut World, ground: IVec3, rand: &mut JavaRandom) {
        match self {
            Self::Tree { spruce: false } => place_oak(world, ground, rand),
            Self::Tree { spruce: true } => place_spruce(world, ground, rand),
            Self::Cactus => place_cactus(world, ground, rand),
            Self::Well => place_well(world, ground),
            Self::House => place_house(world, ground),
            Self::Glowstone => place_glowstone(world, ground, rand),
        }
    }

}

impl FeatureGenerator for Structure {

    fn generate(&mut self, world: &mut World, pos: IVec3, rand: &mut JavaRandom) -> bool {
        if self.can_place(world, pos) {
            self.place(world, pos, rand);
            true
        } else {
            false
        }
    }

}


/// Only replace air, used for leaves.
fn set_if_air(world: &mut World, pos: IVec3, id: u8) {
    if world.is_block(pos, block::AIR) {
        world.set_block(pos, id, 0);
    }
}

fn place_oak(world: &mut World, ground: IVec3, rand: &mut JavaRandom) {

    let base = ground + IVec3::Y;
    let height = 4 + rand.next_int_bounded(3);

    for ly in height - 2..=height + 1 {
        for lx in -2i32..=2 {
            for lz in -2i32..=2 {
                if lx.abs() + lz.abs() + (ly - (height - 2)) < 4 {
                    set_if_air(world, base + IVec3::new(lx, ly, lz), block::LEAVES);
                }
            }
        }
    }

    for ly in 0..height {
        world.set_block(base + IVec3::new(0, ly, 0), block::LOG, 0);
    }

}

fn place_spruce(world: &mut World, ground: IVec3, rand: &mut JavaRandom) {

    let base = ground + IVec3::Y;
    let height = 6 + rand.next_int_bounded(4);

    // Leaves layers alternate between a radius of 2 and 1, narrowing to the top.
    for ly in 2..=height {
        let radius: i32 = match height - ly {
            0 => 0,
            n if n % 2 == 0 || ly < 4 => 1,
            _ => 2,
        };
        for lx in -radius..=radius {
            for lz in -radius..=radius {
                if radius < 2 || lx.abs() + lz.abs() < 4 {
                    set_if_air(world, base + IVec3::new(lx, ly, lz), block::SPRUCE_LEAVES);
                }
            }
        }
    }

    for ly in 0..height {
        world.set_block(base + IVec3::new(0, ly, 0), block::SPRUCE_LOG, 0);
    }

}

fn place_cactus(world: &mut World, ground: IVec3, rand: &mut JavaRandom) {
    let height = 2 + rand.next_int_bounded(2);
    for ly in 1..=height {
        world.set_block(ground + IVec3::new(0, ly, 0), block::CACTUS, 0);
    }
}

fn place_well(world: &mut World, ground: IVec3) {

    for dx in -1..=1 {
        for dz in -1..=1 {
            world.set_block(ground + IVec3::new(dx, 0, dz), block::COBBLESTONE, 0);
            if dx != 0 && dz != 0 {
                world.set_block(ground + IVec3::new(dx, 1, dz), block::LOG, 0);
                world.set_block(ground + IVec3::new(dx, 2, dz), block::LOG, 0);
            }
            world.set_block(ground + IVec3::new(dx, 3, dz), block::COBBLESTONE, 0);
        }
    }

    for dy in 0..3 {
        world.set_block(ground - IVec3::new(0, dy, 0), block::WATER, 0);
    }
    world.set_block(ground - IVec3::new(0, 3, 0), block::COBBLESTONE, 0);

}

fn place_house(world: &mut World, ground: IVec3) {

    for dx in -2i32..=2 {
        for dz in -2i32..=2 {

            world.set_block(ground + IVec3::new(dx, 0, dz), block::PLANKS, 0);
            world.set_block(ground + IVec3::new(dx, 4, dz), block::PLANKS, 0);

            let wall = dx.abs() == 2 || dz.abs() == 2;
            for dy in 1..=3 {
                let pos = ground + IVec3::new(dx, dy, dz);
                let id = if !wall {
                    block::AIR
                } else if dx == 0 && dz == -2 && dy <= 2 {
                    // Door opening.
                    block::AIR
                } else if dy == 2 && (dx == 0 || dz == 0) {
                    block::GLASS
                } else {
                    block::COBBLESTONE
                };
                world.set_block(pos, id, 0);
            }

        }
    }

    // The chest block entity is created along with the block.
    world.set_block(ground + IVec3::new(-1, 1, 1), block::CHEST, 0);

    let mut metadata = 0;
    torch::set_face(&mut metadata, Face::PosX);
    world.set_block(ground + IVec3::new(1, 2, 1), block::TORCH, metadata);

}

fn place_glowstone(world: &mut World, ceiling: IVec3, rand: &mut JavaRandom) {

    let origin = ceiling - IVec3::Y;
    world.set_block(origin, block::GLOWSTONE, 0);

    for _ in 0..150 {

        let pos = origin + IVec3 {
            x: rand.next_int_bounded(6) - rand.next_int_bounded(6),
            y: -rand.next_int_bounded(8),
            z: rand.next_int_bounded(6) - rand.next_int_bounded(6),
        };

        if !world.is_block(pos, block::AIR) {
            continue;
        }

        let neighbors = Face::ALL.into_iter()
            .filter(|face| world.is_block(pos + face.delta(), block::GLOWSTONE))
            .count();

        if neighbors == 1 {
            world.set_block(pos, block::GLOWSTONE, 0);
        }

    }

}
