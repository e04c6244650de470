//! Redstone wire metadata functions.


/// Maximum power level carried by a wire.
pub const MAX_POWER: u8 = 15;

/// Get the power level of a wire from its metadata.
#[inline]
pub fn get_power(metadata: u8) -> u8 {
    metadata.min(MAX_POWER)
}
