//! # World Constants
//!
//! **CRITICAL:** The chunk size is part of the tile format.
//! Every cached tile is `CHUNK_SIZE x CHUNK_SIZE` pixels.

/// Chunk width/depth in blocks (columns per side).
pub const CHUNK_SIZE: usize = 16;

/// Chunk width as a signed value, for world-coordinate math.
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Columns sampled when one chunk tile is built.
pub const COLUMNS_PER_CHUNK: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Lowest Y a column walk visits. Below this the column is "not found".
pub const WORLD_FLOOR_Y: i32 = 0;
