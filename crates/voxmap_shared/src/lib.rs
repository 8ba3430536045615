//! # VOXMAP Shared
//!
//! Common types used by both the host world and the minimap core.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `image`
//! - `tokio`
//! - Any rendering crate
//!
//! If you need raster types, put them in `voxmap_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod accessor;
pub mod block;
pub mod color;
pub mod constants;
pub mod coord;
pub mod math;

pub use accessor::{PlayerState, WorldAccessor};
pub use block::{BlockDef, BlockId, BlockRegistry, SurfaceClass, TextureHints};
pub use color::Rgb;
pub use constants::{CHUNK_SIZE, CHUNK_SIZE_I32, COLUMNS_PER_CHUNK, WORLD_FLOOR_Y};
pub use coord::ChunkCoord;
pub use math::Vec3;
