//! Various math utilities.

mod rand;
mod face;
mod noise;
mod pos;

pub use rand::JavaRandom;
pub use noise::{PerlinNoise, OctaveNoise};
pub use pos::{PackedPos, XZ_MIN, XZ_MAX};

pub use face::{Face, FaceSet};
