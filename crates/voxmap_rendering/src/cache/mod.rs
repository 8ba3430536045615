//! Chunk tiles and the cache that builds them.

mod tile;
mod tile_cache;

pub use tile::{sample_chunk, ChunkTile};
pub use tile_cache::{BuildContext, CacheStats, ChunkTileCache, LoadReport};
