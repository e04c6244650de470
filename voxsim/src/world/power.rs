//! Redstone power calculations. The behavior of each power-producing block is described
//! in this module, these functions never alter the world.

use glam::IVec3;

use crate::block::{self, RedstoneKind, torch, lever, wire};
use crate::util::Face;

use super::World;


impl World {

    /// Return true if the block at the given position is a lit redstone torch that is
    /// not mounted on the target position.
    fn is_torch_powering(&self, pos: IVec3, target: IVec3) -> bool {
        match self.get_block_and_metadata(pos) {
            Some((block::REDSTONE_TORCH, metadata)) => pos + torch::get_face(metadata).delta() != target,
            _ => false,
        }
    }

    /// Return true if the block at the given position is an active lever.
    fn is_lever_active(&self, pos: IVec3) -> bool {
        matches!(self.get_block_and_metadata(pos), Some((block::LEVER, metadata)) if lever::is_active(metadata))
    }

    /// Return true if the given conductive block is strongly powered, by a lit torch
    /// below it or by an active lever attached to it. A strongly powered block feeds
    /// adjacent wires at full power.
    pub fn is_block_strongly_powered(&self, pos: IVec3) -> bool {

        let Some((id, _)) = self.get_block_and_metadata(pos) else { return false };
        if !self.registry.is_conductive(id) {
            return false;
        }

        if self.is_torch_powering(pos - IVec3::Y, pos) {
            return true;
        }

        Face::ALL.into_iter().any(|face| {
            let face_pos = pos + face.delta();
            match self.get_block_and_metadata(face_pos) {
                Some((block::LEVER, metadata)) => {
                    lever::is_active(metadata) && face_pos + lever::get_face(metadata).delta() == pos
                }
                _ => false,
            }
        })

    }

    /// Return true if the given conductive block is powered, strongly or by a powered
    /// wire on top or on its sides.
    pub fn is_block_powered(&self, pos: IVec3) -> bool {

        if self.is_block_strongly_powered(pos) {
            return true;
        }

        let Some((id, _)) = self.get_block_and_metadata(pos) else { return false };
        if !self.registry.is_conductive(id) {
            return false;
        }

        [Face::PosY, Face::NegZ, Face::PosZ, Face::NegX, Face::PosX].into_iter().any(|face| {
            matches!(self.get_block_and_metadata(pos + face.delta()),
                Some((block::REDSTONE_WIRE, metadata)) if wire::get_power(metadata) > 0)
        })

    }

    /// Get the power a wire at the given position should have from its surroundings,
    /// ignoring its current power.
    pub fn get_wire_input_power(&self, pos: IVec3) -> u8 {

        let mut power = 0;

        for face in Face::ALL {

            let face_pos = pos + face.delta();
            let Some((face_id, face_metadata)) = self.get_block_and_metadata(face_pos) else { continue };

            match self.registry.get_redstone(face_id) {
                Some(RedstoneKind::Torch { lit: true }) => {
                    if self.is_torch_powering(face_pos, pos) {
                        return wire::MAX_POWER;
                    }
                }
                Some(RedstoneKind::Lever) => {
                    if lever::is_active(face_metadata) {
                        return wire::MAX_POWER;
                    }
                }
                Some(RedstoneKind::Wire) if !face.is_y() => {
                    power = power.max(wire::get_power(face_metadata).saturating_sub(1));
                }
                _ => {
                    if self.is_block_strongly_powered(face_pos) {
                        return wire::MAX_POWER;
                    }
                }
            }

        }

        power

    }

    /// Return true if a lamp at the given position should be lit.
    pub fn is_lamp_powered(&self, pos: IVec3) -> bool {
        Face::ALL.into_iter().any(|face| {
            let face_pos = pos + face.delta();
            match self.get_block_and_metadata(face_pos) {
                Some((block::REDSTONE_WIRE, metadata)) => wire::get_power(metadata) > 0,
                Some((block::REDSTONE_TORCH, _)) => self.is_torch_powering(face_pos, pos),
                Some((block::LEVER, _)) => self.is_lever_active(face_pos),
                Some(_) => self.is_block_powered(face_pos),
                None => false,
            }
        })
    }

    /// Return true if the block a redstone torch is mounted on is powered, in which
    /// case the torch should be off.
    pub fn is_torch_mount_powered(&self, pos: IVec3, metadata: u8) -> bool {
        self.is_block_powered(pos + torch::get_face(metadata).delta())
    }

}
