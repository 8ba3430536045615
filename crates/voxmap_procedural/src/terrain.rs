//! # Terrain Generation
//!
//! Deterministic surface terrain, one chunk at a time.
//!
//! ## Column Layout
//!
//! ```text
//! y = height + 1 ..       plants on grass, water up to sea level
//! y = height              grass, or sand near the waterline
//! height - 3 .. height    dirt
//! 1 .. height - 3         stone
//! y = 0                   bedrock
//! ```
//!
//! Trees (wood trunk, leaf canopy) are placed per column from a hash of the
//! seed, only where the whole tree fits inside its chunk.

use serde::{Deserialize, Serialize};
use voxmap_shared::{BlockDef, BlockId, BlockRegistry, ChunkCoord, CHUNK_SIZE, CHUNK_SIZE_I32};

use crate::noise::{SimplexNoise, WorldSeed};

/// Generated world height in blocks.
pub const WORLD_HEIGHT: usize = 128;

/// Block ids used by the generator.
pub mod blocks {
    use voxmap_shared::BlockId;

    /// Grass.
    pub const GRASS: BlockId = BlockId(1);
    /// Stone.
    pub const STONE: BlockId = BlockId(2);
    /// Dirt.
    pub const DIRT: BlockId = BlockId(3);
    /// Tree trunk.
    pub const WOOD: BlockId = BlockId(4);
    /// Tree canopy.
    pub const LEAVES: BlockId = BlockId(5);
    /// World floor.
    pub const BEDROCK: BlockId = BlockId(7);
    /// Water.
    pub const WATER: BlockId = BlockId(10);
    /// Beach sand.
    pub const SAND: BlockId = BlockId(11);
    /// Tall grass tuft.
    pub const TALL_GRASS: BlockId = BlockId(12);
    /// Flower.
    pub const FLOWER: BlockId = BlockId(13);
}

/// Registry of every block the generator places, with texture hints.
#[must_use]
pub fn block_registry() -> BlockRegistry {
    BlockRegistry::from_defs([
        BlockDef::opaque(blocks::GRASS.raw(), "grass").with_textures(Some("grass_top"), Some("grass_side")),
        BlockDef::opaque(blocks::STONE.raw(), "stone"),
        BlockDef::opaque(blocks::DIRT.raw(), "dirt"),
        BlockDef::opaque(blocks::WOOD.raw(), "oak_log").with_textures(Some("oak_log_top"), Some("oak_log")),
        BlockDef::leaves(blocks::LEAVES.raw(), "oak_leaves"),
        BlockDef::opaque(blocks::BEDROCK.raw(), "bedrock"),
        BlockDef::water(blocks::WATER.raw(), "water").with_textures(Some("water_still"), None),
        BlockDef::opaque(blocks::SAND.raw(), "sand"),
        BlockDef::plant(blocks::TALL_GRASS.raw(), "tall_grass"),
        BlockDef::plant(blocks::FLOWER.raw(), "dandelion"),
    ])
}

/// Base texture color for a generated block, used to paint stand-in textures.
#[must_use]
pub const fn base_color(id: BlockId) -> Option<[u8; 3]> {
    Some(match id.raw() {
        1 => [96, 160, 64],
        2 => [125, 125, 125],
        3 => [134, 96, 67],
        4 => [102, 81, 50],
        5 => [58, 120, 40],
        7 => [40, 40, 40],
        10 => [50, 90, 200],
        11 => [219, 207, 163],
        12 => [110, 170, 70],
        13 => [230, 210, 40],
        _ => return None,
    })
}

/// Terrain shape parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed.
    pub seed: WorldSeed,
    /// Average ground height.
    pub base_height: i32,
    /// Water fills low columns up to this Y.
    pub sea_level: i32,
    /// Maximum deviation of the ground from `base_height`.
    pub amplitude: f64,
    /// Horizontal frequency of the height noise.
    pub frequency: f64,
    /// Chance per grass column of a plant, `0.0..=1.0`.
    pub plant_density: f64,
    /// Chance per grass column of a tree, `0.0..=1.0`.
    pub tree_density: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            base_height: 64,
            sea_level: 62,
            amplitude: 18.0,
            frequency: 0.008,
            plant_density: 0.12,
            tree_density: 0.012,
        }
    }
}

/// One generated chunk, `WORLD_HEIGHT` blocks tall.
#[derive(Clone)]
pub struct GeneratedChunk {
    coord: ChunkCoord,
    blocks: Box<[BlockId]>,
    heights: [[u8; CHUNK_SIZE]; CHUNK_SIZE],
}

impl GeneratedChunk {
    fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockId::AIR; CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT].into_boxed_slice(),
            heights: [[0; CHUNK_SIZE]; CHUNK_SIZE],
        }
    }

    #[inline]
    const fn index(x: usize, y: usize, z: usize) -> usize {
        (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
    }

    /// Chunk coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Block at local `(x, z)` and world `y`. Air outside the chunk.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: i32, z: usize) -> BlockId {
        if x >= CHUNK_SIZE || z >= CHUNK_SIZE || y < 0 || y as usize >= WORLD_HEIGHT {
            return BlockId::AIR;
        }
        self.blocks[Self::index(x, y as usize, z)]
    }

    /// Replaces a block. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: i32, z: usize, id: BlockId) {
        if x >= CHUNK_SIZE || z >= CHUNK_SIZE || y < 0 || y as usize >= WORLD_HEIGHT {
            return;
        }
        self.blocks[Self::index(x, y as usize, z)] = id;
    }

    /// Terrain height (top ground block, ignoring trees and water) at local `(x, z)`.
    #[must_use]
    pub fn ground_height(&self, x: usize, z: usize) -> i32 {
        i32::from(self.heights[z % CHUNK_SIZE][x % CHUNK_SIZE])
    }
}

/// Deterministic chunk generator.
pub struct TerrainGenerator {
    config: TerrainConfig,
    height_noise: SimplexNoise,
    detail_noise: SimplexNoise,
}

impl TerrainGenerator {
    const TREE_MIN_HEIGHT: i32 = 4;
    const TREE_MAX_HEIGHT: i32 = 6;
    const CANOPY_RADIUS: i32 = 2;

    /// Creates a generator.
    #[must_use]
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            height_noise: SimplexNoise::new(config.seed.derive(1)),
            detail_noise: SimplexNoise::new(config.seed.derive(2)),
            config,
        }
    }

    /// Shape parameters.
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Ground height of world column `(x, z)`, clamped to `1..WORLD_HEIGHT - 12`.
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let f = self.config.frequency;
        let (fx, fz) = (f64::from(x), f64::from(z));
        let base = self.height_noise.fbm(fx * f, fz * f, 5, 0.5, 2.0);
        let detail = self.detail_noise.sample(fx * 0.08, fz * 0.08);
        let h = f64::from(self.config.base_height) + base * self.config.amplitude + detail * 1.5;
        (h.round() as i32).clamp(1, WORLD_HEIGHT as i32 - 12)
    }

    /// Uniform value in `[0, 1)` for a column and purpose.
    fn roll(&self, x: i32, z: i32, purpose: u64) -> f64 {
        let h = self.config.seed.derive(purpose).hash2(x, z);
        (h >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generates the chunk at `coord`.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> GeneratedChunk {
        let mut chunk = GeneratedChunk::empty(coord);
        let sea = self.config.sea_level;

        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let wx = coord.world_x().saturating_add(lx as i32);
                let wz = coord.world_z().saturating_add(lz as i32);
                let height = self.height_at(wx, wz);
                chunk.heights[lz][lx] = height as u8;

                let top = if height <= sea + 1 { blocks::SAND } else { blocks::GRASS };
                chunk.set(lx, 0, lz, blocks::BEDROCK);
                for y in 1..height {
                    let id = if y < height - 3 { blocks::STONE } else { blocks::DIRT };
                    chunk.set(lx, y, lz, id);
                }
                chunk.set(lx, height, lz, top);
                for y in height + 1..=sea {
                    chunk.set(lx, y, lz, blocks::WATER);
                }

                if top == blocks::GRASS && self.roll(wx, wz, 3) < self.config.plant_density {
                    let plant = if self.roll(wx, wz, 4) < 0.2 { blocks::FLOWER } else { blocks::TALL_GRASS };
                    chunk.set(lx, height + 1, lz, plant);
                }
            }
        }

        self.plant_trees(&mut chunk);
        chunk
    }

    fn plant_trees(&self, chunk: &mut GeneratedChunk) {
        let r = Self::CANOPY_RADIUS;
        let coord = chunk.coord;
        for lz in r..CHUNK_SIZE_I32 - r {
            for lx in r..CHUNK_SIZE_I32 - r {
                let (wx, wz) = (coord.world_x().saturating_add(lx), coord.world_z().saturating_add(lz));
                if self.roll(wx, wz, 5) >= self.config.tree_density {
                    continue;
                }
                let (x, z) = (lx as usize, lz as usize);
                let ground = chunk.ground_height(x, z);
                if chunk.get(x, ground, z) != blocks::GRASS {
                    continue;
                }

                let span = Self::TREE_MAX_HEIGHT - Self::TREE_MIN_HEIGHT + 1;
                let trunk = Self::TREE_MIN_HEIGHT + (self.roll(wx, wz, 6) * f64::from(span)) as i32;
                let top = ground + trunk;

                for y in top - 2..=top + 1 {
                    let reach = if y > top { 1 } else { r };
                    for dz in -reach..=reach {
                        for dx in -reach..=reach {
                            if dx.abs() == reach && dz.abs() == reach && reach > 1 {
                                continue;
                            }
                            let (cx, cz) = ((lx + dx) as usize, (lz + dz) as usize);
                            if chunk.get(cx, y, cz).is_air() {
                                chunk.set(cx, y, cz, blocks::LEAVES);
                            }
                        }
                    }
                }
                for y in ground + 1..=top {
                    chunk.set(x, y, z, blocks::WOOD);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> TerrainGenerator {
        TerrainGenerator::new(TerrainConfig {
            seed: WorldSeed::new(seed),
            ..TerrainConfig::default()
        })
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generator(42).generate(ChunkCoord::new(3, -2));
        let b = generator(42).generate(ChunkCoord::new(3, -2));
        assert_eq!(a.blocks, b.blocks);
    }

    #[test]
    fn test_column_layout() {
        let gen = generator(7);
        let chunk = gen.generate(ChunkCoord::new(0, 0));
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let h = chunk.ground_height(x, z);
                assert_eq!(h, gen.height_at(x as i32, z as i32));
                assert_eq!(chunk.get(x, 0, z), blocks::BEDROCK);
                let top = chunk.get(x, h, z);
                assert!(top == blocks::GRASS || top == blocks::SAND, "top {top} at ({x}, {z})");
                if h > 4 {
                    assert_eq!(chunk.get(x, 1, z), blocks::STONE);
                }
            }
        }
    }

    #[test]
    fn test_low_columns_are_flooded() {
        let gen = TerrainGenerator::new(TerrainConfig {
            sea_level: 100,
            ..TerrainConfig::default()
        });
        let chunk = gen.generate(ChunkCoord::new(0, 0));
        let h = chunk.ground_height(0, 0);
        assert!(h < 100);
        assert_eq!(chunk.get(0, 100, 0), blocks::WATER);
        assert_eq!(chunk.get(0, h, 0), blocks::SAND);
    }

    #[test]
    fn test_trees_have_leaves_above_trunk() {
        let gen = TerrainGenerator::new(TerrainConfig {
            tree_density: 1.0,
            sea_level: 1,
            amplitude: 0.0,
            ..TerrainConfig::default()
        });
        let chunk = gen.generate(ChunkCoord::new(0, 0));
        let (x, z) = (8, 8);
        let ground = chunk.ground_height(x, z);
        assert_eq!(chunk.get(x, ground + 1, z), blocks::WOOD);

        let canopy = (ground + 1..WORLD_HEIGHT as i32)
            .map(|y| chunk.get(x, y, z))
            .filter(|id| *id == blocks::LEAVES)
            .count();
        assert!(canopy > 0);
    }

    #[test]
    fn test_registry_covers_every_generated_block() {
        let registry = block_registry();
        let chunk = generator(1).generate(ChunkCoord::new(-1, 5));
        for id in chunk.blocks.iter().filter(|id| !id.is_air()) {
            assert!(registry.get(*id).is_some(), "missing def for {id}");
            assert!(base_color(*id).is_some());
        }
    }
}
