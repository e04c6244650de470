//! The configuration for the host, given from environment variables and lazy
//! initialized when needed.

use std::path::PathBuf;
use std::str::FromStr;
use std::env;

use once_cell::race::OnceBool;
use once_cell::sync::Lazy;

use tracing::warn;

use voxsim::world::{Dimension, WorldConfig};
use voxsim::world::light::LightReseed;
use voxsim::worldgen::TerrainKind;


/// Parse an environment variable, invalid values are ignored with a warning.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignored invalid value {value:?} for {name}");
            None
        }
    }
}

/// Return true if the given variable is set to `1`.
fn flag_var(name: &str) -> bool {
    env::var_os(name)
        .map(|s| s.as_encoded_bytes() == b"1")
        .unwrap_or(false)
}


/// The world seed, set with `VOXSIM_SEED`, defaults to 0.
pub fn seed() -> i64 {
    static ENV: Lazy<i64> = Lazy::new(|| parse_var("VOXSIM_SEED").unwrap_or(0));
    *ENV
}

/// Return true if the world is in the nether, set with `VOXSIM_NETHER=1`.
pub fn nether() -> bool {
    static ENV: OnceBool = OnceBool::new();
    ENV.get_or_init(|| flag_var("VOXSIM_NETHER"))
}

/// Return true if the world is flat, set with `VOXSIM_FLAT=1`.
pub fn flat() -> bool {
    static ENV: OnceBool = OnceBool::new();
    ENV.get_or_init(|| flag_var("VOXSIM_FLAT"))
}

/// Return true if light removal uses the widened re-seed, set with
/// `VOXSIM_LIGHT_WIDENED=1`.
pub fn light_widened() -> bool {
    static ENV: OnceBool = OnceBool::new();
    ENV.get_or_init(|| flag_var("VOXSIM_LIGHT_WIDENED"))
}

/// Radius in chunks of the area generated around the origin, set with
/// `VOXSIM_RADIUS`, defaults to 4.
pub fn radius() -> i32 {
    static ENV: Lazy<i32> = Lazy::new(|| parse_var::<i32>("VOXSIM_RADIUS").unwrap_or(4).clamp(0, 64));
    *ENV
}

/// Directory of the save store, set with `VOXSIM_SAVE_DIR`, defaults to `saves`.
pub fn save_dir() -> &'static PathBuf {
    static ENV: Lazy<PathBuf> = Lazy::new(|| {
        env::var_os("VOXSIM_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("saves"))
    });
    &ENV
}

/// Save slot of the world, set with `VOXSIM_SLOT`, defaults to `default`.
pub fn slot() -> &'static str {
    static ENV: Lazy<String> = Lazy::new(|| env::var("VOXSIM_SLOT").unwrap_or_else(|_| "default".to_string()));
    &ENV
}

/// Build the world configuration from the environment.
pub fn world_config() -> WorldConfig {
    WorldConfig {
        seed: seed(),
        dimension: if nether() { Dimension::Nether } else { Dimension::Overworld },
        terrain: if flat() { TerrainKind::Flat } else { TerrainKind::Default },
        light_reseed: if light_widened() { LightReseed::Widened } else { LightReseed::ResetBox },
        ..WorldConfig::default()
    }
}
