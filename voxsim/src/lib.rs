//! Simulation core of a chunked voxel sandbox world, with light, fluid and redstone
//! propagation engines, procedural terrain and world saves.

pub mod util;

pub mod block;
pub mod block_entity;

pub mod chunk;
pub mod world;
pub mod worldgen;
pub mod save;
