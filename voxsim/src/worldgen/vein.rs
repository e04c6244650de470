//! Ore vein feature.

use std::f32::consts::PI;

use glam::{IVec3, DVec3};

use crate::util::JavaRandom;
use crate::world::World;
use crate::block;

use super::FeatureGenerator;


/// A generator of ellipsoid veins of a block, replacing only a given block.
#[derive(Debug, Clone, Copy)]
pub struct VeinGenerator {
    replace_id: u8,
    place_id: u8,
    count: u8,
}

impl VeinGenerator {

    #[inline]
    pub fn new(replace_id: u8, place_id: u8, count: u8) -> Self {
        Self {
            replace_id,
            place_id,
            count,
        }
    }

    /// A vein of ore replacing stone.
    #[inline]
    pub fn new_ore(place_id: u8, count: u8) -> Self {
        Self::new(block::STONE, place_id, count)
    }

    /// A vein of ore replacing netherrack.
    #[inline]
    pub fn new_nether_ore(place_id: u8, count: u8) -> Self {
        Self::new(block::NETHERRACK, place_id, count)
    }

}

impl FeatureGenerator for VeinGenerator {

    fn generate(&mut self, world: &mut World, pos: IVec3, rand: &mut JavaRandom) -> bool {

        let count = self.count.max(1);
        let angle = rand.next_float() * PI;
        let angle_sin = angle.sin() * count as f32 / 8.0;
        let angle_cos = angle.cos() * count as f32 / 8.0;

        let line_start = DVec3 {
            x: ((pos.x + 8) as f32 + angle_sin) as f64,
            y: (pos.y + rand.next_int_bounded(3) + 2) as f64,
            z: ((pos.z + 8) as f32 + angle_cos) as f64,
        };

        let line_stop = DVec3 {
            x: ((pos.x + 8) as f32 - angle_sin) as f64,
            y: (pos.y + rand.next_int_bounded(3) + 2) as f64,
            z: ((pos.z + 8) as f32 - angle_cos) as f64,
        };

        let mut placed = false;

        for i in 0..=count {

            // Interpolation.
            let center_pos = line_start + (line_stop - line_start) * i as f64 / count as f64;

            let base_size = rand.next_double() * count as f64 / 16.0;
            let size = ((i as f32 * PI / count as f32).sin() + 1.0) as f64 * base_size + 1.0;
            let half_size = size / 2.0;

            let start = (center_pos - half_size).floor().as_ivec3();
            let stop = (center_pos + half_size).floor().as_ivec3();

            for x in start.x..=stop.x {
                for z in start.z..=stop.z {
                    for y in start.y..=stop.y {

                        let place_pos = IVec3::new(x, y, z);
                        let delta = (place_pos.as_dvec3() + 0.5 - center_pos) / half_size;

                        if delta.length_squared() < 1.0 && world.is_block(place_pos, self.replace_id) {
                            world.set_block(place_pos, self.place_id, 0);
                            placed = true;
                        }

                    }
                }
            }

        }

        placed

    }

}


#[cfg(test)]
mod tests {

    use crate::world::test_util::flat_world;

    use super::*;

    #[test]
    fn replaces_only_target() {

        let mut world = flat_world();
        let mut rand = JavaRandom::new(3);
        // The vein is centered around (8, 2..5, 8) in the dirt layers of the flat world.
        assert!(VeinGenerator::new(block::DIRT, block::GRAVEL, 12).generate(&mut world, IVec3::new(0, 0, 0), &mut rand));

        let mut gravel = 0;
        for x in -8..24 {
            for z in -8..24 {
                for y in 0..10 {
                    let pos = IVec3::new(x, y, z);
                    if world.is_block(pos, block::GRAVEL) {
                        assert!((1..4).contains(&y), "gravel at {pos}");
                        gravel += 1;
                    }
                }
            }
        }
        assert!(gravel > 0);

        let mut rand = JavaRandom::new(3);
        assert!(!VeinGenerator::new_ore(block::COAL_ORE, 12).generate(&mut world, IVec3::new(0, 0, 0), &mut rand));

    }

}
