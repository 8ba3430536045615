//! # VOXMAP Procedural
//!
//! Deterministic reference host for the minimap: simplex terrain with
//! water, trees and plants, streamed in chunk by chunk.
//!
//! ## RULES
//!
//! - Same seed = same world, ALWAYS
//! - No rendering code
//! - Everything the minimap sees goes through `WorldAccessor`

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod noise;
pub mod terrain;
pub mod world;

pub use noise::{SimplexNoise, WorldSeed};
pub use terrain::{base_color, block_registry, blocks, GeneratedChunk, TerrainConfig, TerrainGenerator, WORLD_HEIGHT};
pub use world::{ProceduralWorld, StreamingConfig};
