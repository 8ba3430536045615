//! # VOXMAP Rendering
//!
//! Rotating circular minimap for a live voxel world, drawn from the top down.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ STARTUP (async, once)                                           │
//! │   wait_for_registry ──> ColorTableBuilder ──> ColorTable        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ FRAME (sync, every display refresh)                             │
//! │   player chunk ──> ChunkTileCache::ensure_loaded                │
//! │                      └── sample_column x 256 per missing chunk  │
//! │   Compositor ──> clear, blit tiles, marker, rotate by yaw       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MANDATE
//!
//! - The frame path never suspends and never returns an error
//! - Column walks only run for chunks that are missing from the cache
//! - Every block color is known before the first frame

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod error;
pub mod palette;
pub mod pipeline;
pub mod sampler;
pub mod surface;

pub use cache::{BuildContext, CacheStats, ChunkTile, ChunkTileCache, LoadReport};
pub use config::{AssetConfig, CacheConfig, ColorConfig, MinimapConfig, TimingConfig, ViewportConfig};
pub use error::{MinimapError, MinimapResult};
pub use palette::{
    AssetIndex, AssetResolver, ColorTable, ColorTableBuilder, ColorTableReport, FsImageSource, ImageSource,
    MemoryImageSource,
};
pub use pipeline::{
    rotation_degrees, wait_for_registry, Compositor, FrameOutcome, FrameReport, FrameStats, FrameStatsAccumulator,
    RenderLoop, SkipReason,
};
pub use sampler::{sample_column, ColumnSample};
pub use surface::{RasterSurface, RenderSurface};
