//! # Procedural Host World
//!
//! A stand-in for a live game: it owns the generated chunks and the player,
//! and it streams data in over time the way a real host does.
//!
//! ## Streaming Model
//!
//! - The block registry is published `registry_delay` after creation.
//! - Chunks exist only after `stream_step` generated them; until then every
//!   block in them reads as air.
//! - Each `stream_step` generates at most `chunks_per_step` chunks around the
//!   player, nearest first.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use voxmap_shared::{BlockId, BlockRegistry, ChunkCoord, PlayerState, Vec3, WorldAccessor, CHUNK_SIZE_I32};

use crate::terrain::{block_registry, GeneratedChunk, TerrainConfig, TerrainGenerator};

/// Streaming behaviour of the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Delay before the block registry becomes visible, in milliseconds.
    pub registry_delay_ms: u64,
    /// Chunks (Chebyshev radius) kept generated around the player.
    pub radius: u32,
    /// Chunks generated per `stream_step`. `0` generates the whole radius.
    pub chunks_per_step: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            registry_delay_ms: 0,
            radius: 4,
            chunks_per_step: 0,
        }
    }
}

/// Host world with generated terrain and a single player.
pub struct ProceduralWorld {
    generator: TerrainGenerator,
    registry: BlockRegistry,
    registry_ready_at: Instant,
    chunks: HashMap<ChunkCoord, GeneratedChunk>,
    player: Option<PlayerState>,
    streaming: StreamingConfig,
}

impl ProceduralWorld {
    /// Creates a world with nothing streamed in and no player.
    #[must_use]
    pub fn new(terrain: TerrainConfig, streaming: StreamingConfig) -> Self {
        Self {
            generator: TerrainGenerator::new(terrain),
            registry: block_registry(),
            registry_ready_at: Instant::now() + Duration::from_millis(streaming.registry_delay_ms),
            chunks: HashMap::new(),
            player: None,
            streaming,
        }
    }

    /// The terrain generator.
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Places the player on the ground at `(x, z)`.
    pub fn spawn_player(&mut self, x: f32, z: f32, yaw: f32) {
        let ground = self.generator.height_at(x.floor() as i32, z.floor() as i32);
        let y = ground.max(self.generator.config().sea_level) as f32 + 1.0;
        self.player = Some(PlayerState::new(Vec3::new(x, y, z), yaw));
        tracing::info!("player spawned at ({x:.1}, {y:.1}, {z:.1})");
    }

    /// Moves the player.
    pub fn set_player(&mut self, position: Vec3, yaw: f32) {
        self.player = Some(PlayerState::new(position, yaw));
    }

    /// Removes the player (e.g. between levels).
    pub fn despawn_player(&mut self) {
        self.player = None;
    }

    /// Generates missing chunks around the player. Returns how many were generated.
    pub fn stream_step(&mut self) -> usize {
        let Some(player) = self.player else {
            return 0;
        };
        let center = ChunkCoord::from_world_pos(player.position.x, player.position.z);
        let budget = match self.streaming.chunks_per_step {
            0 => usize::MAX,
            n => n,
        };

        let mut generated = 0;
        for coord in center.window_nearest_first(self.streaming.radius) {
            if generated >= budget {
                break;
            }
            if self.chunks.contains_key(&coord) {
                continue;
            }
            self.chunks.insert(coord, self.generator.generate(coord));
            generated += 1;
        }
        if generated > 0 {
            tracing::trace!("streamed {generated} chunks around {center}");
        }
        generated
    }

    /// Generates a chunk immediately.
    pub fn load_chunk(&mut self, coord: ChunkCoord) {
        self.chunks
            .entry(coord)
            .or_insert_with(|| self.generator.generate(coord));
    }

    /// Drops a chunk; its blocks read as air again.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> bool {
        self.chunks.remove(&coord).is_some()
    }

    /// Returns true if the chunk has been generated.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of generated chunks.
    #[must_use]
    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Changes one block. Ignored if the chunk is not loaded.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let coord = ChunkCoord::from_block_pos(x, z);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.set(
                x.rem_euclid(CHUNK_SIZE_I32) as usize,
                y,
                z.rem_euclid(CHUNK_SIZE_I32) as usize,
                id,
            );
        }
    }
}

impl WorldAccessor for ProceduralWorld {
    fn block_registry(&self) -> Option<&BlockRegistry> {
        (Instant::now() >= self.registry_ready_at).then_some(&self.registry)
    }

    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.chunks
            .get(&ChunkCoord::from_block_pos(x, z))
            .map_or(BlockId::AIR, |chunk| {
                chunk.get(
                    x.rem_euclid(CHUNK_SIZE_I32) as usize,
                    y,
                    z.rem_euclid(CHUNK_SIZE_I32) as usize,
                )
            })
    }

    fn player_position(&self) -> Option<Vec3> {
        self.player.map(|p| p.position)
    }

    fn player_yaw(&self) -> Option<f32> {
        self.player.map(|p| p.yaw)
    }
}
