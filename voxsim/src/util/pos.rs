//! Integer-packed block positions, used as compact keys for sets and maps of positions.

use glam::IVec3;


const XZ_BITS: u32 = 28;
const XZ_MASK: u64 = (1 << XZ_BITS) - 1;
const Y_BITS: u32 = 8;
const Y_MASK: u64 = (1 << Y_BITS) - 1;

const Z_SHIFT: u32 = Y_BITS;
const X_SHIFT: u32 = Y_BITS + XZ_BITS;

/// Bounds of the X and Z coordinates that can be packed.
pub const XZ_MIN: i32 = -(1 << (XZ_BITS - 1));
pub const XZ_MAX: i32 = (1 << (XZ_BITS - 1)) - 1;


/// A block position packed in a single 64 bits integer, layout is `x:28 z:28 y:8`.
///
/// Every position with a Y coordinate between 0 and 255 and X/Z coordinates between
/// -2^27 and 2^27 (excluded) can be packed and unpacked without loss, this is wider
/// than the world's valid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedPos(pub u64);

impl PackedPos {

    /// Pack the given position.
    #[inline]
    pub fn new(pos: IVec3) -> Self {
        debug_assert!(pos.y >= 0 && pos.y <= Y_MASK as i32, "y out of packable range");
        debug_assert!(is_xz_packable(pos.x) && is_xz_packable(pos.z), "x/z out of packable range");
        let x = pos.x as u64 & XZ_MASK;
        let z = pos.z as u64 & XZ_MASK;
        let y = pos.y as u64 & Y_MASK;
        Self((x << X_SHIFT) | (z << Z_SHIFT) | y)
    }

    /// Pack the given position, none if it cannot be packed without loss.
    #[inline]
    pub fn try_new(pos: IVec3) -> Option<Self> {
        let valid = pos.y >= 0 && pos.y <= Y_MASK as i32 && is_xz_packable(pos.x) && is_xz_packable(pos.z);
        valid.then(|| Self::new(pos))
    }

    /// Unpack the position.
    #[inline]
    pub fn unpack(self) -> IVec3 {
        IVec3 {
            x: sign_extend((self.0 >> X_SHIFT) & XZ_MASK),
            y: (self.0 & Y_MASK) as i32,
            z: sign_extend((self.0 >> Z_SHIFT) & XZ_MASK),
        }
    }

}

impl From<IVec3> for PackedPos {
    #[inline]
    fn from(pos: IVec3) -> Self {
        Self::new(pos)
    }
}

impl From<PackedPos> for IVec3 {
    #[inline]
    fn from(pos: PackedPos) -> Self {
        pos.unpack()
    }
}

/// Return true if the given X or Z coordinate can be packed without loss.
#[inline]
pub fn is_xz_packable(value: i32) -> bool {
    (XZ_MIN..=XZ_MAX).contains(&value)
}

#[inline]
fn sign_extend(value: u64) -> i32 {
    let shift = 64 - XZ_BITS;
    (((value << shift) as i64) >> shift) as i32
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn pack_unpack() {
        for pos in [
            IVec3::new(0, 0, 0),
            IVec3::new(-1, 64, -1),
            IVec3::new(15, 127, -16),
            IVec3::new(-134_217_728, 5, 134_217_727),
            IVec3::new(1_000_000, 0, -1_000_000),
        ] {
            assert_eq!(PackedPos::new(pos).unpack(), pos);
        }
    }

    #[test]
    fn distinct_neighbors() {
        let center = PackedPos::new(IVec3::new(-3, 10, 7));
        let others = [IVec3::X, IVec3::NEG_X, IVec3::Y, IVec3::NEG_Y, IVec3::Z, IVec3::NEG_Z]
            .map(|d| PackedPos::new(IVec3::new(-3, 10, 7) + d));
        assert!(others.iter().all(|&p| p != center));
    }


    #[test]
    fn xz_bounds() {
        assert!(is_xz_packable(XZ_MIN) && is_xz_packable(XZ_MAX));
        assert!(!is_xz_packable(XZ_MAX + 1) && !is_xz_packable(XZ_MIN - 1));
        assert_eq!(PackedPos::new(IVec3::new(XZ_MAX, 0, XZ_MIN)).unpack(), IVec3::new(XZ_MAX, 0, XZ_MIN));
    }

    #[test]
    fn try_pack() {
        assert_eq!(PackedPos::try_new(IVec3::new(XZ_MIN, 255, 0)).map(PackedPos::unpack), Some(IVec3::new(XZ_MIN, 255, 0)));
        assert_eq!(PackedPos::try_new(IVec3::new(0, 0, XZ_MAX + 1)), None);
        assert_eq!(PackedPos::try_new(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "x/z out of packable range")]
    fn aliasing_rejected() {
        PackedPos::new(IVec3::new(XZ_MAX + 1, 0, 0));
    }

}
