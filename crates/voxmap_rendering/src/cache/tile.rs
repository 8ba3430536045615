//! Chunk tiles.
//!
//! A tile is the pre-rendered surface of one chunk: a 16x16 RGBA raster (one
//! pixel per column) plus the column samples it was made from.

use image::{Rgba, RgbaImage};
use voxmap_shared::{BlockRegistry, ChunkCoord, WorldAccessor, CHUNK_SIZE, CHUNK_SIZE_I32, COLUMNS_PER_CHUNK};

use crate::palette::ColorTable;
use crate::sampler::{sample_column, ColumnSample};

/// Transparent pixel for columns with no surface.
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Runs the column sampler over every column of `coord`.
///
/// Samples are laid out `z * 16 + x` with local coordinates.
#[must_use]
pub fn sample_chunk<W>(
    world: &W,
    registry: &BlockRegistry,
    coord: ChunkCoord,
    start_y: f32,
    show_plants: bool,
) -> Vec<ColumnSample>
where
    W: WorldAccessor + ?Sized,
{
    let mut samples = Vec::with_capacity(COLUMNS_PER_CHUNK);
    for lz in 0..CHUNK_SIZE_I32 {
        for lx in 0..CHUNK_SIZE_I32 {
            samples.push(sample_column(
                world,
                registry,
                coord.world_x().saturating_add(lx),
                coord.world_z().saturating_add(lz),
                start_y,
                show_plants,
            ));
        }
    }
    samples
}

/// Pre-rendered surface of one chunk.
#[derive(Clone, Debug)]
pub struct ChunkTile {
    coord: ChunkCoord,
    raster: RgbaImage,
    samples: Vec<ColumnSample>,
    found: usize,
}

impl ChunkTile {
    /// Rasterizes a sample grid.
    ///
    /// Columns with a surface get the table's color at full opacity; the rest
    /// stay transparent whatever block id they carry.
    ///
    /// # Panics
    ///
    /// Panics if `samples` does not hold exactly one sample per column.
    #[must_use]
    pub(crate) fn from_samples(coord: ChunkCoord, samples: Vec<ColumnSample>, colors: &ColorTable) -> Self {
        assert_eq!(samples.len(), COLUMNS_PER_CHUNK, "one sample per column");

        let side = CHUNK_SIZE as u32;
        let raster = RgbaImage::from_fn(side, side, |x, z| {
            let sample = samples[(z * side + x) as usize];
            if sample.found && !sample.block.is_air() {
                Rgba(colors.color_of(sample.block).with_alpha(u8::MAX))
            } else {
                CLEAR
            }
        });
        let found = samples.iter().filter(|s| s.found).count();

        Self {
            coord,
            raster,
            samples,
            found,
        }
    }

    /// Chunk this tile covers.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The 16x16 raster, x right, z down.
    #[inline]
    #[must_use]
    pub const fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Sample at local column `(x, z)`.
    #[must_use]
    pub fn sample(&self, x: usize, z: usize) -> Option<ColumnSample> {
        if x >= CHUNK_SIZE || z >= CHUNK_SIZE {
            return None;
        }
        self.samples.get(z * CHUNK_SIZE + x).copied()
    }

    /// Columns where a surface was found.
    #[inline]
    #[must_use]
    pub const fn found_columns(&self) -> usize {
        self.found
    }

    /// True when no column found a surface (host data not streamed in yet).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.found == 0
    }
}
