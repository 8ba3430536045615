//! # VOXMAP
//!
//! Rotating circular minimap for voxel worlds.
//!
//! This crate re-exports the minimap core and the procedural host, and
//! carries the pieces only the demo needs: stand-in block textures and a
//! scripted walk that renders the minimap to a PNG.
//!
//! ## Crates
//!
//! | Crate               | Contents                                        |
//! |---------------------|-------------------------------------------------|
//! | `voxmap_shared`     | block ids, registry, chunk coords, accessor     |
//! | `voxmap_rendering`  | sampler, color table, tile cache, compositor    |
//! | `voxmap_procedural` | noise terrain and a streaming host world        |

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod demo;
pub mod textures;

pub use voxmap_procedural as procedural;
pub use voxmap_rendering as rendering;
pub use voxmap_shared as shared;

pub use demo::{run_demo, DemoConfig, DemoError, DemoSummary, WalkConfig};
pub use textures::procedural_textures;
