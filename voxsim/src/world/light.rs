//! Block light propagation. Light is pulled by each position from its neighbors, so that
//! increases spread one block per evaluation. Decreases are handled by resetting a box
//! around the position and re-seeding emitters.

use glam::IVec3;
use tracing::{trace, instrument};

use crate::chunk::{calc_chunk_pos, CHUNK_HEIGHT};
use crate::util::Face;

use super::{World, Event};


/// Maximum light level.
pub const MAX_LIGHT: u8 = 15;
/// Radius of the box reset when light is removed, no light can travel farther.
const RESET_RADIUS: i32 = MAX_LIGHT as i32;


/// Policy for re-seeding light after a reset box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightReseed {
    /// Only emitters inside the reset box are re-seeded. Light coming from emitters
    /// outside of the box is not restored until something else enqueues these cells.
    #[default]
    ResetBox,
    /// Emitters are scanned up to the reset radius plus the maximum light level, and
    /// the border of the reset box pulls back light from outside.
    Widened,
}


impl World {

    /// Get the light re-seed policy of this world.
    pub fn get_light_reseed(&self) -> LightReseed {
        self.light_reseed
    }

    /// Tick the light engine, pending removals are applied before the frontier.
    #[instrument(skip_all)]
    pub(super) fn tick_light(&mut self) {

        let removals = self.light_removals.take_batch(usize::MAX);
        for pos in removals {
            self.remove_light(pos);
        }

        let batch = self.light_frontier.take_batch(self.max_updates_per_tick);
        trace!("light batch: {}, remaining: {}", batch.len(), self.light_frontier.len());

        for pos in batch {
            // Enqueued again while draining, it will be evaluated on next tick.
            if self.light_frontier.contains(pos) {
                continue;
            }
            self.update_light(pos);
        }

    }

    /// Evaluate light at a single position, if it increases the neighbors that can get
    /// brighter are enqueued.
    fn update_light(&mut self, pos: IVec3) {

        let Some((id, _)) = self.get_block_and_metadata(pos) else { return };

        let current = self.get_light(pos);
        let mut level = self.registry.get_light_emission(id);

        if !self.registry.is_opaque(id) {
            for face in Face::ALL {
                level = level.max(self.get_light(pos + face.delta()).saturating_sub(1));
            }
        }

        if level <= current {
            return;
        }

        self.set_light_inner(pos, level);

        for face in Face::ALL {
            let face_pos = pos + face.delta();
            if let Some((face_id, _)) = self.get_block_and_metadata(face_pos) {
                if !self.registry.is_opaque(face_id) && self.get_light(face_pos) < level - 1 {
                    self.light_frontier.insert(face_pos);
                }
            }
        }

    }

    /// Reset light in the box around the position and re-seed emitters.
    fn remove_light(&mut self, center: IVec3) {

        let min_y = (center.y - RESET_RADIUS).max(0);
        let max_y = (center.y + RESET_RADIUS).min(CHUNK_HEIGHT as i32 - 1);

        for x in center.x - RESET_RADIUS..=center.x + RESET_RADIUS {
            for z in center.z - RESET_RADIUS..=center.z + RESET_RADIUS {
                for y in min_y..=max_y {
                    let pos = IVec3::new(x, y, z);
                    if self.get_light(pos) != 0 {
                        self.set_light_inner(pos, 0);
                    }
                }
            }
        }

        let scan_radius = match self.light_reseed {
            LightReseed::ResetBox => RESET_RADIUS,
            LightReseed::Widened => RESET_RADIUS + MAX_LIGHT as i32,
        };

        let scan_min_y = (center.y - scan_radius).max(0);
        let scan_max_y = (center.y + scan_radius).min(CHUNK_HEIGHT as i32 - 1);
        let mut reseeded = 0usize;

        for x in center.x - scan_radius..=center.x + scan_radius {
            for z in center.z - scan_radius..=center.z + scan_radius {
                // Skip whole columns that are not generated.
                if calc_chunk_pos(IVec3::new(x, 0, z)).is_none_or(|(cx, cz)| !self.chunks.contains_key(&(cx, cz))) {
                    continue;
                }
                for y in scan_min_y..=scan_max_y {
                    let pos = IVec3::new(x, y, z);
                    if self.registry.get_light_emission(self.get_block(pos)) > 0 {
                        self.light_frontier.insert_around(pos);
                        reseeded += 1;
                    }
                }
            }
        }

        if self.light_reseed == LightReseed::Widened {
            // Light coming from outside of the box re-enters through its border.
            for x in center.x - RESET_RADIUS..=center.x + RESET_RADIUS {
                for z in center.z - RESET_RADIUS..=center.z + RESET_RADIUS {
                    for y in min_y..=max_y {
                        let border = (x - center.x).abs() == RESET_RADIUS
                            || (z - center.z).abs() == RESET_RADIUS
                            || (y - center.y).abs() == RESET_RADIUS;
                        if border {
                            let pos = IVec3::new(x, y, z);
                            if matches!(self.get_block_and_metadata(pos), Some((id, _)) if !self.registry.is_opaque(id)) {
                                self.light_frontier.insert(pos);
                            }
                        }
                    }
                }
            }
        }

        trace!("removed light at {center}, reseeded {reseeded} emitters");

    }

    /// Internal function to write light in a generated chunk, pushing an event.
    fn set_light_inner(&mut self, pos: IVec3, level: u8) {
        let Some((cx, cz)) = calc_chunk_pos(pos) else { return };
        let Some(chunk) = self.chunks.get_mut(&(cx, cz)) else { return };
        chunk.set_light(pos, level);
        self.push_event(Event::Light { pos, level });
    }

}


#[cfg(test)]
mod tests {

    use crate::world::test_util::{flat_world, flat_world_with};
    use crate::block;

    use super::*;

    #[test]
    fn torch_light() {

        let mut world = flat_world();
        let torch = IVec3::new(0, 64, 0);

        world.set_block(torch, block::TORCH, 0);
        world.settle(100);
        assert!(world.is_quiescent());
        assert_eq!(world.get_light(torch), 15);
        assert_eq!(world.get_light(torch + IVec3::X), 14);
        assert_eq!(world.get_light(torch + IVec3::new(3, 0, -2)), 10);

        world.set_block(torch, block::AIR, 0);
        world.settle(100);
        assert_eq!(world.get_light(torch), 0);
        assert_eq!(world.get_light(torch + IVec3::X), 0);

    }

    #[test]
    fn opaque_blocks_stop_light() {

        let mut world = flat_world();
        let torch = IVec3::new(0, 40, 0);

        world.set_block(torch, block::TORCH, 0);
        world.settle(100);
        assert_eq!(world.get_light(torch + IVec3::new(2, 0, 0)), 13);

        world.set_block(torch + IVec3::X, block::STONE, 0);
        world.settle(100);
        assert_eq!(world.get_light(torch + IVec3::X), 0);
        // Now lit around the stone.
        assert_eq!(world.get_light(torch + IVec3::new(2, 0, 0)), 11);

    }

    #[test]
    fn two_sources() {

        let mut world = flat_world();
        let first = IVec3::new(0, 64, 0);
        let second = IVec3::new(10, 64, 0);

        world.set_block(first, block::TORCH, 0);
        world.set_block(second, block::TORCH, 0);
        world.settle(100);
        assert_eq!(world.get_light(IVec3::new(5, 64, 0)), 10);

        // The second source is inside the reset box, so it's reseeded.
        world.set_block(first, block::AIR, 0);
        world.settle(100);
        assert_eq!(world.get_light(first), 5);
        assert_eq!(world.get_light(IVec3::new(5, 64, 0)), 10);

        // Light is at least emission minus manhattan distance.
        for dx in -5..=5 {
            for dy in -5..=5 {
                let pos = second + IVec3::new(dx, dy, 0);
                let dist = dx.abs() + dy.abs();
                assert!(world.get_light(pos) as i32 >= 15 - dist, "at {pos}");
            }
        }

    }

    #[test]
    fn reseed_outside_box() {

        let first = IVec3::new(0, 64, 0);
        let second = IVec3::new(16, 64, 0);
        let target = IVec3::new(15, 64, 0);

        // The source outside of the reset box doesn't restore the border.
        let mut world = flat_world_with(LightReseed::ResetBox);
        world.set_block(first, block::TORCH, 0);
        world.set_block(second, block::TORCH, 0);
        world.settle(100);
        assert_eq!(world.get_light(target), 14);
        world.set_block(first, block::AIR, 0);
        world.settle(100);
        assert_eq!(world.get_light(target), 0);

        let mut world = flat_world_with(LightReseed::Widened);
        world.set_block(first, block::TORCH, 0);
        world.set_block(second, block::TORCH, 0);
        world.settle(100);
        world.set_block(first, block::AIR, 0);
        world.settle(100);
        assert_eq!(world.get_light(target), 14);
        assert_eq!(world.get_light(IVec3::new(14, 64, 0)), 13);
        assert_eq!(world.get_light(first), 0);

    }

}
