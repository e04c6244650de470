//! Redstone propagation of wires, torches and lamps.

use glam::IVec3;
use tracing::{trace, instrument};

use crate::block::{self, RedstoneKind, wire};
use crate::util::Face;

use super::World;


impl World {

    /// Tick the redstone engine.
    #[instrument(skip_all)]
    pub(super) fn tick_redstone(&mut self) {

        let batch = self.redstone_frontier.take_batch(self.max_updates_per_tick);
        trace!("redstone batch: {}, remaining: {}", batch.len(), self.redstone_frontier.len());

        self.begin_drain();
        for pos in batch {
            if self.is_drain_written(pos) {
                continue;
            }
            let Some((id, metadata)) = self.get_block_and_metadata(pos) else { continue };
            match self.registry.get_redstone(id) {
                Some(RedstoneKind::Wire) => self.update_wire(pos, metadata),
                Some(RedstoneKind::Torch { lit }) => self.update_redstone_torch(pos, metadata, lit),
                Some(RedstoneKind::Lamp { lit }) => self.update_lamp(pos, lit),
                Some(RedstoneKind::Lever) | None => {}
            }
        }
        self.end_drain();

    }

    /// Update the power of a wire. When its power decreases the wires it may have fed are
    /// depowered, they are then recomputed on next tick from their remaining sources.
    fn update_wire(&mut self, pos: IVec3, metadata: u8) {
        let current = wire::get_power(metadata);
        let power = self.get_wire_input_power(pos);
        if power > current {
            self.set_metadata_inner(pos, power);
        } else if power < current {
            self.depower_wire(pos, current);
        }
    }

    /// Zero the wire and flood through connected wires that have less power than the
    /// wire they are reached from.
    fn depower_wire(&mut self, pos: IVec3, power: u8) {

        let mut pending = vec![(pos, power)];
        self.set_metadata_inner(pos, 0);

        while let Some((pending_pos, pending_power)) = pending.pop() {
            for face in Face::HORIZONTAL {
                let face_pos = pending_pos + face.delta();
                if let Some((block::REDSTONE_WIRE, face_metadata)) = self.get_block_and_metadata(face_pos) {
                    let face_power = wire::get_power(face_metadata);
                    if face_power > 0 && face_power < pending_power {
                        self.set_metadata_inner(face_pos, 0);
                        pending.push((face_pos, face_power));
                    }
                }
            }
        }

    }

    /// A redstone torch turns off when its mount block is powered.
    fn update_redstone_torch(&mut self, pos: IVec3, metadata: u8, lit: bool) {
        let powered = self.is_torch_mount_powered(pos, metadata);
        if lit && powered {
            self.set_block_inner(pos, block::REDSTONE_TORCH_OFF, metadata);
        } else if !lit && !powered {
            self.set_block_inner(pos, block::REDSTONE_TORCH, metadata);
        }
    }

    fn update_lamp(&mut self, pos: IVec3, lit: bool) {
        let powered = self.is_lamp_powered(pos);
        if powered != lit {
            let id = if powered { block::REDSTONE_LAMP_LIT } else { block::REDSTONE_LAMP };
            self.set_block_inner(pos, id, 0);
        }
    }

}


#[cfg(test)]
mod tests {

    use crate::world::test_util::flat_world;
    use crate::world::World;
    use crate::block::lever;

    use super::*;

    fn wires(world: &World, from: IVec3, count: i32) -> Vec<u8> {
        (0..count).map(|i| world.get_metadata(from + IVec3::new(i, 0, 0))).collect()
    }

    #[test]
    fn torch_wire_lamp() {

        let mut world = flat_world();
        let torch = IVec3::new(0, 50, 0);
        let lamp = IVec3::new(4, 50, 0);

        world.set_block(torch, block::REDSTONE_TORCH, 0);
        for x in 1..=3 {
            world.set_block(IVec3::new(x, 50, 0), block::REDSTONE_WIRE, 0);
        }
        world.set_block(lamp, block::REDSTONE_LAMP, 0);
        world.settle(100);

        assert_eq!(wires(&world, torch + IVec3::X, 3), [15, 14, 13]);
        assert_eq!(world.get_block(lamp), block::REDSTONE_LAMP_LIT);
        assert_eq!(world.get_light(lamp), 15);

        world.set_block(torch, block::AIR, 0);
        world.settle(100);

        assert_eq!(wires(&world, torch + IVec3::X, 3), [0, 0, 0]);
        assert_eq!(world.get_block(lamp), block::REDSTONE_LAMP);
        assert_eq!(world.get_light(lamp), 0);

    }

    #[test]
    fn two_sources_keep_power() {

        let mut world = flat_world();
        world.set_block(IVec3::new(0, 50, 0), block::REDSTONE_TORCH, 0);
        world.set_block(IVec3::new(6, 50, 0), block::REDSTONE_TORCH, 0);
        for x in 1..=5 {
            world.set_block(IVec3::new(x, 50, 0), block::REDSTONE_WIRE, 0);
        }
        world.settle(100);
        assert_eq!(wires(&world, IVec3::new(1, 50, 0), 5), [15, 14, 13, 14, 15]);

        world.set_block(IVec3::new(0, 50, 0), block::AIR, 0);
        world.settle(100);
        assert_eq!(wires(&world, IVec3::new(1, 50, 0), 5), [11, 12, 13, 14, 15]);

    }

    #[test]
    fn lever_turns_torch_off() {

        let mut world = flat_world();
        let mount = IVec3::new(0, 50, 0);
        let torch = mount + IVec3::Y;
        let lever = mount + IVec3::X;
        let lamp = torch + IVec3::Z;

        world.set_block(mount, block::STONE, 0);
        world.set_block(torch, block::REDSTONE_TORCH, 0);
        world.set_block(lamp, block::REDSTONE_LAMP, 0);

        let mut metadata = 0;
        lever::set_face(&mut metadata, Face::NegX);
        world.set_block(lever, block::LEVER, metadata);
        world.settle(100);
        assert_eq!(world.get_block(torch), block::REDSTONE_TORCH);
        assert_eq!(world.get_block(lamp), block::REDSTONE_LAMP_LIT);

        // The torch reacts on the tick following the lever, the lamp one tick later.
        lever::set_active(&mut metadata, true);
        world.set_metadata(lever, metadata);
        world.tick();
        assert_eq!(world.get_block(torch), block::REDSTONE_TORCH_OFF);
        assert_eq!(world.get_block(lamp), block::REDSTONE_LAMP_LIT);
        world.tick();
        assert_eq!(world.get_block(lamp), block::REDSTONE_LAMP);

        lever::set_active(&mut metadata, false);
        world.set_metadata(lever, metadata);
        world.tick();
        assert_eq!(world.get_block(torch), block::REDSTONE_TORCH);
        world.tick();
        assert_eq!(world.get_block(lamp), block::REDSTONE_LAMP_LIT);

    }

    #[test]
    fn wire_ring_terminates() {

        let mut world = flat_world();
        let center = IVec3::new(8, 50, 8);
        let torch = center + IVec3::new(-3, 0, 0);

        for dx in -2i32..=2 {
            for dz in -2i32..=2 {
                if dx.abs() == 2 || dz.abs() == 2 {
                    world.set_block(center + IVec3::new(dx, 0, dz), block::REDSTONE_WIRE, 0);
                }
            }
        }

        world.set_block(torch, block::REDSTONE_TORCH, 0);
        assert!(world.settle(200) < 200);
        assert_eq!(world.get_metadata(torch + IVec3::X), 15);
        assert_eq!(world.get_metadata(center + IVec3::new(2, 0, 0)), 7);

        world.set_block(torch, block::AIR, 0);
        assert!(world.settle(200) < 200);
        for dx in -2..=2 {
            assert_eq!(world.get_metadata(center + IVec3::new(dx, 0, 2)), 0);
        }

    }

}
