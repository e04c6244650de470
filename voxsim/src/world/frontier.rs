//! Ordered sets of positions waiting to be evaluated by an engine.

use indexmap::IndexSet;
use glam::IVec3;

use crate::chunk::CHUNK_HEIGHT;
use crate::util::{Face, PackedPos};


/// A frontier is an insertion-ordered set of positions, each position is present at most
/// once and positions are taken in the order they were first inserted.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    inner: IndexSet<PackedPos>,
}

impl Frontier {

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position, positions with invalid Y coordinate or outside of the world's
    /// horizontal range are ignored. Returns true if the position has been inserted,
    /// false if ignored or already present.
    #[inline]
    pub fn insert(&mut self, pos: IVec3) -> bool {
        if pos.y >= CHUNK_HEIGHT as i32 {
            return false;
        }
        match PackedPos::try_new(pos) {
            Some(packed) => self.inner.insert(packed),
            None => false,
        }
    }

    /// Insert the position and its six neighbors.
    pub fn insert_around(&mut self, pos: IVec3) {
        self.insert(pos);
        for face in Face::ALL {
            self.insert(pos + face.delta());
        }
    }

    /// Insert all positions within the given manhattan distance of the center, included.
    pub fn insert_diamond(&mut self, center: IVec3, radius: i32) {
        for dy in -radius..=radius {
            let rem_y = radius - dy.abs();
            for dx in -rem_y..=rem_y {
                let rem_x = rem_y - dx.abs();
                for dz in -rem_x..=rem_x {
                    self.insert(center + IVec3::new(dx, dy, dz));
                }
            }
        }
    }

    #[inline]
    pub fn contains(&self, pos: IVec3) -> bool {
        if pos.y >= CHUNK_HEIGHT as i32 {
            return false;
        }
        PackedPos::try_new(pos).is_some_and(|packed| self.inner.contains(&packed))
    }

    /// Take at most the given number of positions, oldest first. The remaining positions
    /// stay in the frontier, ahead of positions inserted afterward.
    pub fn take_batch(&mut self, max: usize) -> Vec<IVec3> {
        let len = self.inner.len().min(max);
        self.inner.drain(..len).map(PackedPos::unpack).collect()
    }

    /// Only keep positions for which the predicate returns true, order is kept.
    pub fn retain(&mut self, mut predicate: impl FnMut(IVec3) -> bool) {
        self.inner.retain(|pos| predicate(pos.unpack()));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

}
