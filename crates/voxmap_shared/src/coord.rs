//! Chunk coordinates and chunk windows.

use serde::{Deserialize, Serialize};

use crate::constants::CHUNK_SIZE_I32;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE_I32),
            z: block_z.div_euclid(CHUNK_SIZE_I32),
        }
    }

    /// Converts a floating-point world position to the chunk containing it.
    #[inline]
    #[must_use]
    pub fn from_world_pos(world_x: f32, world_z: f32) -> Self {
        Self::from_block_pos(world_x.floor() as i32, world_z.floor() as i32)
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    ///
    /// Saturates at the edge of the `i32` block range.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x.saturating_mul(CHUNK_SIZE_I32)
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z.saturating_mul(CHUNK_SIZE_I32)
    }

    /// Chebyshev (chessboard) distance in chunks.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        if dx > dz {
            dx
        } else {
            dz
        }
    }

    /// All coordinates within `radius` (Chebyshev) of `self`, row by row.
    ///
    /// Yields `(2r + 1)^2` coordinates.
    pub fn window(self, radius: u32) -> impl Iterator<Item = Self> {
        let r = radius as i32;
        let center = self;
        (-r..=r).flat_map(move |dx| {
            (-r..=r).map(move |dz| Self::new(center.x.saturating_add(dx), center.z.saturating_add(dz)))
        })
    }

    /// Same set as [`ChunkCoord::window`], ordered nearest ring first.
    #[must_use]
    pub fn window_nearest_first(self, radius: u32) -> Vec<Self> {
        let mut coords: Vec<Self> = self.window(radius).collect();
        coords.sort_by_key(|c| (c.chebyshev_distance(self), c.x, c.z));
        coords
    }

    /// Number of chunks in a window of `radius`.
    #[inline]
    #[must_use]
    pub const fn window_len(radius: u32) -> usize {
        let side = 2 * radius as usize + 1;
        side * side
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.z)
    }
}
