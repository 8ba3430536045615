//! # Chunk Tile Cache
//!
//! Keeps one `ChunkTile` per chunk around the player and decides when the
//! column sampler runs.
//!
//! ## Chunk States
//!
//! ```text
//!              build (found > 0)
//!   absent ─────────────────────────> Ready ──(LRU, if bounded)──> absent
//!     │  ^
//!     │  └──── retry_at passed ─────┐
//!     │   build (found == 0)        │
//!     └──────────────────────> EmptyRetry
//! ```
//!
//! Builds only run while the cache is dirty. It becomes dirty when the
//! player's chunk changes, when an `EmptyRetry` inside the load window
//! expires, or while a per-frame build budget left part of the window
//! unbuilt. A `Ready` tile never expires and is never rebuilt.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use voxmap_shared::{BlockRegistry, ChunkCoord, WorldAccessor, CHUNK_SIZE_I32};

use super::tile::{sample_chunk, ChunkTile};
use crate::config::CacheConfig;
use crate::palette::ColorTable;
use crate::sampler::ColumnSample;

/// Everything a chunk build reads, borrowed for one frame.
pub struct BuildContext<'a, W: ?Sized> {
    /// Host world.
    pub world: &'a W,
    /// Host block registry.
    pub registry: &'a BlockRegistry,
    /// Block colors.
    pub colors: &'a ColorTable,
    /// Y the column walks start from (player Y plus scan offset).
    pub scan_y: f32,
    /// Count thin vegetation as surface.
    pub show_plants: bool,
}

enum TileSlot {
    Ready { tile: ChunkTile, last_needed: u64 },
    EmptyRetry { retry_at: Instant },
}

/// What one `ensure_loaded` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The window was scanned for missing chunks.
    pub triggered: bool,
    /// Chunks built into `Ready` tiles.
    pub built: usize,
    /// Chunks that sampled empty and were scheduled for retry.
    pub empty: usize,
    /// Window chunks left for a later frame by the build budget.
    pub deferred: usize,
}

/// Lifetime counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Chunk builds that produced a tile.
    pub tiles_built: u64,
    /// Chunk builds that sampled empty.
    pub empty_builds: u64,
    /// Tiles dropped by the capacity bound.
    pub evictions: u64,
}

/// Cache of chunk tiles keyed by chunk coordinate.
pub struct ChunkTileCache {
    slots: HashMap<ChunkCoord, TileSlot>,
    last_center: Option<ChunkCoord>,
    dirty: bool,
    retry_delay: Duration,
    capacity: usize,
    max_builds_per_frame: usize,
    tick: u64,
    stats: CacheStats,
}

impl ChunkTileCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            slots: HashMap::new(),
            last_center: None,
            dirty: true,
            retry_delay: config.retry_delay(),
            capacity: config.capacity,
            max_builds_per_frame: config.max_builds_per_frame,
            tick: 0,
            stats: CacheStats::default(),
        }
    }

    /// Builds the missing chunks within `load_radius` of `center`, if dirty.
    ///
    /// Expired retries are dropped first; one inside the window re-arms the
    /// dirty flag. Chunks are built nearest first, at most
    /// `max_builds_per_frame` per call when that is non-zero.
    pub fn ensure_loaded<W>(
        &mut self,
        ctx: &BuildContext<'_, W>,
        center: ChunkCoord,
        load_radius: u32,
        now: Instant,
    ) -> LoadReport
    where
        W: WorldAccessor + ?Sized,
    {
        self.tick += 1;
        self.purge_expired(center, load_radius, now);

        if self.last_center != Some(center) {
            tracing::trace!("player chunk {center}, rebuilding window");
            self.last_center = Some(center);
            self.dirty = true;
        }

        let mut report = LoadReport::default();
        if !self.dirty {
            return report;
        }
        report.triggered = true;

        let budget = match self.max_builds_per_frame {
            0 => usize::MAX,
            n => n,
        };

        for coord in center.window_nearest_first(load_radius) {
            match self.slots.get_mut(&coord) {
                Some(TileSlot::Ready { last_needed, .. }) => {
                    *last_needed = self.tick;
                    continue;
                }
                Some(TileSlot::EmptyRetry { .. }) => continue,
                None => {}
            }

            if report.built + report.empty >= budget {
                report.deferred += 1;
                continue;
            }

            let samples = sample_chunk(ctx.world, ctx.registry, coord, ctx.scan_y, ctx.show_plants);
            let tile = ChunkTile::from_samples(coord, samples, ctx.colors);

            if tile.is_empty() {
                tracing::debug!("chunk {coord} sampled empty, retry in {:?}", self.retry_delay);
                self.stats.empty_builds += 1;
                report.empty += 1;
                self.slots.insert(
                    coord,
                    TileSlot::EmptyRetry {
                        retry_at: now + self.retry_delay,
                    },
                );
            } else {
                tracing::trace!("chunk {coord} built, {} columns", tile.found_columns());
                self.stats.tiles_built += 1;
                report.built += 1;
                self.slots.insert(
                    coord,
                    TileSlot::Ready {
                        tile,
                        last_needed: self.tick,
                    },
                );
            }
        }

        self.dirty = report.deferred > 0;
        report
    }

    /// Marks ready tiles within `radius` of `center` as needed this frame,
    /// then evicts least recently needed tiles beyond the capacity bound.
    ///
    /// Returns the number of tiles evicted.
    pub fn touch_window(&mut self, center: ChunkCoord, radius: u32) -> usize {
        for coord in center.window(radius) {
            if let Some(TileSlot::Ready { last_needed, .. }) = self.slots.get_mut(&coord) {
                *last_needed = self.tick;
            }
        }
        self.evict_over_capacity()
    }

    fn purge_expired(&mut self, center: ChunkCoord, load_radius: u32, now: Instant) {
        let mut rearm = false;
        self.slots.retain(|coord, slot| match slot {
            TileSlot::EmptyRetry { retry_at } if *retry_at <= now => {
                if coord.chebyshev_distance(center) <= load_radius {
                    rearm = true;
                }
                false
            }
            _ => true,
        });
        if rearm {
            tracing::debug!("empty chunk retry due near {center}");
            self.dirty = true;
        }
    }

    fn evict_over_capacity(&mut self) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        let ready = self.len();
        if ready <= self.capacity {
            return 0;
        }

        let tick = self.tick;
        let mut candidates: Vec<(u64, ChunkCoord)> = self
            .slots
            .iter()
            .filter_map(|(coord, slot)| match slot {
                TileSlot::Ready { last_needed, .. } if *last_needed < tick => Some((*last_needed, *coord)),
                _ => None,
            })
            .collect();
        candidates.sort_unstable();

        let evicted = (ready - self.capacity).min(candidates.len());
        for (_, coord) in candidates.into_iter().take(evicted) {
            self.slots.remove(&coord);
        }
        self.stats.evictions += evicted as u64;
        tracing::debug!("evicted {evicted} tiles, {} remain", self.len());
        evicted
    }

    /// Ready tile for `coord`.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkTile> {
        match self.slots.get(&coord) {
            Some(TileSlot::Ready { tile, .. }) => Some(tile),
            _ => None,
        }
    }

    /// Surface column at world `(x, z)`, if its chunk is built and the column found one.
    #[must_use]
    pub fn surface_at(&self, world_x: i32, world_z: i32) -> Option<ColumnSample> {
        let tile = self.get(ChunkCoord::from_block_pos(world_x, world_z))?;
        let lx = world_x.rem_euclid(CHUNK_SIZE_I32) as usize;
        let lz = world_z.rem_euclid(CHUNK_SIZE_I32) as usize;
        tile.sample(lx, lz).filter(|s| s.found)
    }

    /// Returns true if `coord` sampled empty and waits for its retry.
    #[must_use]
    pub fn is_retry_pending(&self, coord: ChunkCoord) -> bool {
        matches!(self.slots.get(&coord), Some(TileSlot::EmptyRetry { .. }))
    }

    /// Number of ready tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, TileSlot::Ready { .. }))
            .count()
    }

    /// Returns true if no tile is ready.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of chunks waiting for a retry.
    #[must_use]
    pub fn pending_retries(&self) -> usize {
        self.slots.len() - self.len()
    }

    /// Returns true if the next `ensure_loaded` will scan the window.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Lifetime counters.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use voxmap_shared::{BlockDef, BlockId, Rgb, Vec3};

    /// Flat stone at y = 40 in every streamed chunk, nothing elsewhere.
    struct FlatWorld {
        registry: BlockRegistry,
        missing: RefCell<HashSet<ChunkCoord>>,
        reads: Cell<u64>,
    }

    impl FlatWorld {
        fn new() -> Self {
            Self {
                registry: BlockRegistry::from_defs([BlockDef::opaque(1, "stone")]),
                missing: RefCell::new(HashSet::new()),
                reads: Cell::new(0),
            }
        }
    }

    impl WorldAccessor for FlatWorld {
        fn block_registry(&self) -> Option<&BlockRegistry> {
            Some(&self.registry)
        }

        fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
            self.reads.set(self.reads.get() + 1);
            if self.missing.borrow().contains(&ChunkCoord::from_block_pos(x, z)) || y > 40 {
                BlockId::AIR
            } else {
                BlockId(1)
            }
        }

        fn player_position(&self) -> Option<Vec3> {
            None
        }

        fn player_yaw(&self) -> Option<f32> {
            None
        }
    }

    fn load(
        cache: &mut ChunkTileCache,
        world: &FlatWorld,
        colors: &ColorTable,
        center: ChunkCoord,
        radius: u32,
        now: Instant,
    ) -> LoadReport {
        let ctx = BuildContext {
            world,
            registry: &world.registry,
            colors,
            scan_y: 64.0 + 20.0,
            show_plants: false,
        };
        cache.ensure_loaded(&ctx, center, radius, now)
    }

    fn colors() -> ColorTable {
        ColorTable::from_entries([(BlockId(1), Rgb::new(128, 128, 128))], Rgb::GRAY)
    }

    #[test]
    fn test_load_window_radius_3() {
        let world = FlatWorld::new();
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        let center = ChunkCoord::from_world_pos(0.0, 0.0);

        let report = load(&mut cache, &world, &colors(), center, 3, Instant::now());

        assert_eq!(center, ChunkCoord::new(0, 0));
        assert_eq!(report.built, 49);
        assert_eq!(cache.len(), 49);
        assert!(cache.get(ChunkCoord::new(-3, -3)).is_some());
        assert!(cache.get(ChunkCoord::new(3, 3)).is_some());
        assert!(cache.get(ChunkCoord::new(4, 0)).is_none());
    }

    #[test]
    fn test_ensure_loaded_is_idempotent() {
        let world = FlatWorld::new();
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        let colors = colors();
        let now = Instant::now();

        load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        let reads = world.reads.get();
        assert!(reads > 0);

        let second = load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        assert!(!second.triggered);
        assert_eq!(world.reads.get(), reads);
    }

    #[test]
    fn test_moving_builds_only_new_chunks() {
        let world = FlatWorld::new();
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        let colors = colors();
        let now = Instant::now();

        load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        let report = load(&mut cache, &world, &colors, ChunkCoord::new(1, 0), 1, now);
        assert_eq!(report.built, 3);
        assert_eq!(cache.len(), 12);
    }

    #[test]
    fn test_empty_chunk_is_retried_after_delay() {
        let world = FlatWorld::new();
        world.missing.borrow_mut().insert(ChunkCoord::new(1, 0));
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        let colors = colors();
        let t0 = Instant::now();

        let report = load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, t0);
        assert_eq!((report.built, report.empty), (8, 1));
        assert!(cache.get(ChunkCoord::new(1, 0)).is_none());
        assert!(cache.is_retry_pending(ChunkCoord::new(1, 0)));

        // Host streams the chunk in, but the retry is not due yet.
        world.missing.borrow_mut().clear();
        let early = load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, t0 + Duration::from_millis(500));
        assert!(!early.triggered);
        assert!(cache.get(ChunkCoord::new(1, 0)).is_none());

        // Same player chunk: the expired retry alone re-arms the build.
        let due = load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, t0 + Duration::from_millis(1000));
        assert_eq!(due.built, 1);
        assert!(cache.get(ChunkCoord::new(1, 0)).is_some());
        assert_eq!(cache.pending_retries(), 0);
    }

    #[test]
    fn test_expired_retry_outside_window_is_dropped() {
        let world = FlatWorld::new();
        world.missing.borrow_mut().insert(ChunkCoord::new(1, 0));
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        let colors = colors();
        let t0 = Instant::now();

        load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, t0);
        load(&mut cache, &world, &colors, ChunkCoord::new(-5, 0), 1, t0 + Duration::from_secs(2));
        assert_eq!(cache.pending_retries(), 0);
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_built_tiles_never_expire() {
        let world = FlatWorld::new();
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        let colors = colors();
        let t0 = Instant::now();

        load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, t0);
        load(&mut cache, &world, &colors, ChunkCoord::new(40, 40), 1, t0 + Duration::from_secs(3600));
        cache.touch_window(ChunkCoord::new(40, 40), 1);

        assert!(cache.get(ChunkCoord::new(0, 0)).is_some());
        assert_eq!(cache.len(), 18);
    }

    #[test]
    fn test_surface_at() {
        let world = FlatWorld::new();
        let mut cache = ChunkTileCache::new(&CacheConfig::default());
        load(&mut cache, &world, &colors(), ChunkCoord::new(0, 0), 1, Instant::now());

        let s = cache.surface_at(-3, 17).unwrap();
        assert_eq!((s.block, s.height), (BlockId(1), 40));
        assert_eq!(cache.surface_at(100, 100), None);
    }

    #[test]
    fn test_capacity_evicts_least_recently_needed() {
        let world = FlatWorld::new();
        let config = CacheConfig {
            capacity: 9,
            ..CacheConfig::default()
        };
        let mut cache = ChunkTileCache::new(&config);
        let colors = colors();
        let now = Instant::now();

        load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        assert_eq!(cache.touch_window(ChunkCoord::new(0, 0), 1), 0);

        load(&mut cache, &world, &colors, ChunkCoord::new(10, 0), 1, now);
        assert_eq!(cache.touch_window(ChunkCoord::new(10, 0), 1), 9);

        assert_eq!(cache.len(), 9);
        assert!(cache.get(ChunkCoord::new(0, 0)).is_none());
        assert!(cache.get(ChunkCoord::new(10, 0)).is_some());
        assert_eq!(cache.stats().evictions, 9);
    }

    #[test]
    fn test_build_budget_spreads_over_frames() {
        let world = FlatWorld::new();
        let config = CacheConfig {
            max_builds_per_frame: 4,
            ..CacheConfig::default()
        };
        let mut cache = ChunkTileCache::new(&config);
        let colors = colors();
        let now = Instant::now();

        let first = load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        assert_eq!((first.built, first.deferred), (4, 5));
        assert!(cache.get(ChunkCoord::new(0, 0)).is_some());
        assert!(cache.is_dirty());

        load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        let last = load(&mut cache, &world, &colors, ChunkCoord::new(0, 0), 1, now);
        assert_eq!(last.built, 1);
        assert_eq!(cache.len(), 9);
        assert!(!cache.is_dirty());
    }
}
