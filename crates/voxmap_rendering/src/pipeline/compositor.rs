//! # Compositor
//!
//! One call per display frame. Synchronous, never fails, never waits.
//!
//! ```text
//! player state ──> chunk coord ──> ensure_loaded ──> clear
//!                                                     │
//!        set_rotation(yaw) <── marker <── blit render window
//! ```

use std::time::{Duration, Instant};

use voxmap_shared::{ChunkCoord, WorldAccessor};

use crate::cache::{BuildContext, ChunkTileCache, LoadReport};
use crate::config::{ColorConfig, MinimapConfig, ViewportConfig};
use crate::palette::ColorTable;
use crate::surface::RenderSurface;

/// Converts a yaw in radians to the viewport rotation in degrees.
///
/// The result keeps the sign of `yaw` and lies in `(-360, 360)`.
#[inline]
#[must_use]
pub fn rotation_degrees(yaw: f32) -> f32 {
    yaw.to_degrees() % 360.0
}

/// Why a frame drew nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Player position or yaw is not available yet.
    NoPlayer,
    /// Block registry is not available yet.
    NoRegistry,
}

/// What a drawn frame did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// The player's chunk.
    pub center: ChunkCoord,
    /// Rotation applied to the surface, in degrees.
    pub rotation_deg: f32,
    /// Tiles blitted.
    pub tiles_drawn: u32,
    /// Tile cache work.
    pub load: LoadReport,
    /// Tiles evicted by the capacity bound.
    pub evicted: usize,
    /// Time spent loading chunks.
    pub load_time: Duration,
    /// Time spent drawing.
    pub draw_time: Duration,
}

/// Result of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The host was not ready; the surface was left untouched.
    Skipped(SkipReason),
    /// The frame was drawn.
    Drawn(FrameReport),
}

impl FrameOutcome {
    /// Report of a drawn frame.
    #[must_use]
    pub const fn report(&self) -> Option<&FrameReport> {
        match self {
            Self::Drawn(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }
}

/// Draws the minimap for the current player state.
pub struct Compositor {
    viewport: ViewportConfig,
    colors: ColorConfig,
    cache: ChunkTileCache,
    table: ColorTable,
}

impl Compositor {
    /// Creates a compositor with an empty tile cache.
    #[must_use]
    pub fn new(config: &MinimapConfig, table: ColorTable) -> Self {
        Self {
            viewport: config.viewport.clone(),
            colors: config.colors.clone(),
            cache: ChunkTileCache::new(&config.cache),
            table,
        }
    }

    /// Renders one frame into `surface`.
    ///
    /// `now` drives empty-chunk retry timing.
    pub fn render_frame<W, S>(&mut self, world: &W, surface: &mut S, now: Instant) -> FrameOutcome
    where
        W: WorldAccessor + ?Sized,
        S: RenderSurface + ?Sized,
    {
        let Some(player) = world.player_state() else {
            return FrameOutcome::Skipped(SkipReason::NoPlayer);
        };
        let Some(registry) = world.block_registry() else {
            return FrameOutcome::Skipped(SkipReason::NoRegistry);
        };
        let pos = player.position;
        let center = ChunkCoord::from_world_pos(pos.x, pos.z);

        let load_start = Instant::now();
        let ctx = BuildContext {
            world,
            registry,
            colors: &self.table,
            scan_y: pos.y + self.viewport.scan_offset,
            show_plants: self.viewport.show_plants,
        };
        let load = self.cache.ensure_loaded(&ctx, center, self.viewport.load_radius, now);
        let evicted = self.cache.touch_window(center, self.viewport.render_radius);
        let load_time = load_start.elapsed();

        let draw_start = Instant::now();
        surface.clear();

        // Scale to the surface actually drawn on, so tiles and marker share a center.
        let block_px = self.viewport.block_size_for(surface.size());
        let tile_px = self.viewport.tile_draw_for(surface.size());
        let radius = self.viewport.view_radius;
        let mut tiles_drawn = 0;

        for coord in center.window(self.viewport.render_radius) {
            let Some(tile) = self.cache.get(coord) else {
                continue;
            };
            let x = (coord.world_x() as f32 - pos.x + radius) * block_px;
            let y = (coord.world_z() as f32 - pos.z + radius) * block_px;
            surface.draw_image_scaled(tile.raster(), x, y, tile_px, tile_px);
            tiles_drawn += 1;
        }

        let mid = surface.size() as f32 / 2.0;
        let marker = self.viewport.marker_radius_px;
        if marker > 0.0 {
            surface.fill_circle(mid, mid, marker, self.colors.marker_fill);
            surface.stroke_circle(mid, mid, marker, 1.0, self.colors.marker_stroke);
        }

        let rotation_deg = rotation_degrees(player.yaw);
        surface.set_rotation(rotation_deg);

        FrameOutcome::Drawn(FrameReport {
            center,
            rotation_deg,
            tiles_drawn,
            load,
            evicted,
            load_time,
            draw_time: draw_start.elapsed(),
        })
    }

    /// The tile cache.
    #[must_use]
    pub const fn cache(&self) -> &ChunkTileCache {
        &self.cache
    }

    /// The color table.
    #[must_use]
    pub const fn color_table(&self) -> &ColorTable {
        &self.table
    }

    /// Viewport settings.
    #[must_use]
    pub const fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }
}
