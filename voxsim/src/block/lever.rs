//! Lever special functions for metadata.

use crate::util::Face;


/// The face the lever is attached to, the mount block is at `pos + face.delta()`.
/// Metadata 0 (the default) is a lever on the floor.
#[inline]
pub fn get_face(metadata: u8) -> Face {
    match metadata & 7 {
        1 => Face::NegX,
        2 => Face::PosX,
        3 => Face::NegZ,
        4 => Face::PosZ,
        5 => Face::PosY,
        _ => Face::NegY,
    }
}

#[inline]
pub fn set_face(metadata: &mut u8, face: Face) {
    *metadata &= !7;
    *metadata |= match face {
        Face::NegY => 0,
        Face::NegX => 1,
        Face::PosX => 2,
        Face::NegZ => 3,
        Face::PosZ => 4,
        Face::PosY => 5,
    }
}

/// Return true if the lever is currently active.
#[inline]
pub fn is_active(metadata: u8) -> bool {
    metadata & 8 != 0
}

/// Set the lever active or not.
#[inline]
pub fn set_active(metadata: &mut u8, active: bool) {
    *metadata &= !8;
    *metadata |= (active as u8) << 3;
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn face_and_active_bits() {
        let mut metadata = 0;
        set_face(&mut metadata, Face::PosZ);
        set_active(&mut metadata, true);
        assert_eq!(get_face(metadata), Face::PosZ);
        assert!(is_active(metadata));
        set_active(&mut metadata, false);
        assert_eq!(get_face(metadata), Face::PosZ);
        assert!(!is_active(metadata));
    }

}
