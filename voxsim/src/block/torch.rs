//! Torch (including redstone torch) metadata functions.

use crate::util::Face;


/// Get the face this torch is attached to, the mount block is at `pos + face.delta()`.
/// Metadata 0 (the default) is a standing torch mounted on the block below.
#[inline]
pub fn get_face(metadata: u8) -> Face {
    match metadata {
        1 => Face::NegX,
        2 => Face::PosX,
        3 => Face::NegZ,
        4 => Face::PosZ,
        _ => Face::NegY,
    }
}

#[inline]
pub fn set_face(metadata: &mut u8, face: Face) {
    *metadata = match face {
        Face::NegX => 1,
        Face::PosX => 2,
        Face::NegZ => 3,
        Face::PosZ => 4,
        _ => 0,
    }
}
