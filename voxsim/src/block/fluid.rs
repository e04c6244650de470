//! Fluid block special functions, the metadata of water and lava is their level.

use crate::block;


/// Level of a source fluid block, it never depletes.
pub const SOURCE_LEVEL: u8 = 8;
/// Level given to a fluid block that is falling from above.
pub const FALLING_LEVEL: u8 = 7;


/// Get the level of a fluid block from its metadata, between 1 and 8. A metadata of 0
/// (the default when placing a block) or above 8 is read as a source.
#[inline]
pub fn get_level(metadata: u8) -> u8 {
    match metadata {
        1..=7 => metadata,
        _ => SOURCE_LEVEL,
    }
}

/// Return true if this fluid block acts like a source.
#[inline]
pub fn is_source(metadata: u8) -> bool {
    get_level(metadata) == SOURCE_LEVEL
}

/// Return true if the given block is a fluid block.
#[inline]
pub fn is_fluid_block(id: u8) -> bool {
    matches!(id, block::WATER | block::LAVA)
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn levels() {
        assert_eq!(get_level(0), 8);
        assert_eq!(get_level(3), 3);
        assert_eq!(get_level(8), 8);
        assert_eq!(get_level(200), 8);
        assert!(is_source(0));
        assert!(!is_source(7));
    }

}
