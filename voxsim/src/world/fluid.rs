//! Fluid flow. Each liquid position recomputes its level from its neighbors and then
//! spreads down, or horizontally when it can't fall.

use glam::IVec3;
use tracing::{trace, instrument};

use crate::block::fluid::{self, SOURCE_LEVEL, FALLING_LEVEL};
use crate::util::Face;
use crate::block;

use super::{World, Dimension};


/// Flow rules of a fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidRules {
    /// Level lost for each block of horizontal distance.
    pub drop: u8,
    /// True if two adjacent sources turn a flowing block into a new source.
    pub infinite: bool,
}


impl World {

    /// Get the flow rules of a fluid block in this world, none if the block is not a
    /// fluid.
    pub fn get_fluid_rules(&self, id: u8) -> Option<FluidRules> {
        match id {
            block::WATER => Some(FluidRules { drop: 1, infinite: true }),
            block::LAVA => Some(FluidRules {
                drop: if self.dimension == Dimension::Nether { 1 } else { 2 },
                infinite: false,
            }),
            _ => None,
        }
    }

    /// Tick the fluid engine.
    #[instrument(skip_all)]
    pub(super) fn tick_fluid(&mut self) {

        let batch = self.fluid_frontier.take_batch(self.max_updates_per_tick);
        trace!("fluid batch: {}, remaining: {}", batch.len(), self.fluid_frontier.len());

        self.begin_drain();
        for pos in batch {
            // Already changed by this tick, it has been enqueued for the next one.
            if self.is_drain_written(pos) {
                continue;
            }
            let Some((id, metadata)) = self.get_block_and_metadata(pos) else { continue };
            let Some(rules) = self.get_fluid_rules(id) else { continue };
            self.update_fluid(pos, id, metadata, rules);
        }
        self.end_drain();

    }

    /// Update a single fluid block.
    fn update_fluid(&mut self, pos: IVec3, id: u8, metadata: u8, rules: FluidRules) {

        let mut level = fluid::get_level(metadata);

        // Flowing blocks recompute their level from their neighbors.
        if level < SOURCE_LEVEL {

            let mut strongest = 0;
            let mut sources_around = 0u8;

            for face in Face::HORIZONTAL {
                if let Some((face_id, face_metadata)) = self.get_block_and_metadata(pos + face.delta()) {
                    if face_id == id {
                        let face_level = fluid::get_level(face_metadata);
                        strongest = strongest.max(face_level);
                        if face_level == SOURCE_LEVEL {
                            sources_around += 1;
                        }
                    }
                }
            }

            let new_level = if rules.infinite && sources_around >= 2 {
                SOURCE_LEVEL
            } else if self.is_block(pos + IVec3::Y, id) {
                FALLING_LEVEL
            } else {
                strongest.saturating_sub(rules.drop)
            };

            if new_level != level {
                if new_level == 0 {
                    self.set_block_inner(pos, block::AIR, 0);
                    return;
                }
                self.set_metadata_inner(pos, new_level);
                level = new_level;
            }

        }

        let below_pos = pos - IVec3::Y;
        // Unloaded or out of the world is considered blocking.
        let below = self.get_block_and_metadata(below_pos);
        let blocked_below = below.is_none_or(|(below_id, _)| self.registry.is_solid(below_id));

        if let Some((below_id, below_metadata)) = below {
            if !blocked_below {
                if below_id == id {
                    if fluid::get_level(below_metadata) < FALLING_LEVEL {
                        self.set_metadata_inner(below_pos, FALLING_LEVEL);
                    }
                } else if self.registry.is_liquid(below_id) {
                    self.mix_fluid(below_pos, below_id, below_metadata);
                } else {
                    self.set_block_inner(below_pos, id, FALLING_LEVEL);
                }
            }
        }

        if level != SOURCE_LEVEL && !blocked_below {
            return;
        }

        let spread_level = level.saturating_sub(rules.drop);
        if spread_level == 0 {
            return;
        }

        for face in Face::HORIZONTAL {
            let face_pos = pos + face.delta();
            let Some((face_id, face_metadata)) = self.get_block_and_metadata(face_pos) else { continue };
            if face_id == id {
                if fluid::get_level(face_metadata) < spread_level {
                    self.set_metadata_inner(face_pos, spread_level);
                }
            } else if self.registry.is_liquid(face_id) {
                self.mix_fluid(face_pos, face_id, face_metadata);
            } else if !self.registry.is_solid(face_id) {
                self.set_block_inner(face_pos, id, spread_level);
            }
        }

    }

    /// A fluid flows into a position holding another fluid, lava hardens into obsidian
    /// if it was a source and cobblestone otherwise.
    fn mix_fluid(&mut self, pos: IVec3, id: u8, metadata: u8) {
        let hardened = if id == block::LAVA && fluid::is_source(metadata) {
            block::OBSIDIAN
        } else {
            block::COBBLESTONE
        };
        self.set_block_inner(pos, hardened, 0);
    }

}
