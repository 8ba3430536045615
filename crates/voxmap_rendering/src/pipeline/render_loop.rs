//! # Render Loop
//!
//! Startup is the only async part of the minimap:
//!
//! 1. poll the host until its block registry exists
//! 2. build the color table (every texture load joined)
//! 3. hand out a `RenderLoop` that ticks synchronously once per frame
//!
//! After `start` returns nothing suspends except the optional frame pacing
//! in [`RenderLoop::wait_next_frame`].

use std::time::{Duration, Instant};

use tokio::time::{Interval, MissedTickBehavior};
use voxmap_shared::{BlockRegistry, WorldAccessor};

use super::compositor::{Compositor, FrameOutcome};
use super::stats::{FrameStats, FrameStatsAccumulator};
use crate::config::MinimapConfig;
use crate::palette::{AssetResolver, ColorTable, ColorTableBuilder, ColorTableReport, ImageSource};
use crate::surface::RenderSurface;

/// Polls `world` every `poll` until its block registry exists.
///
/// There is no timeout; a host that never finishes loading keeps this
/// pending forever.
pub async fn wait_for_registry<W>(world: &W, poll: Duration) -> &BlockRegistry
where
    W: WorldAccessor + ?Sized,
{
    let mut polls = 0u64;
    loop {
        if let Some(registry) = world.block_registry() {
            tracing::info!("block registry ready after {polls} polls ({} blocks)", registry.len());
            return registry;
        }
        polls += 1;
        tracing::debug!("block registry not ready, poll {polls}");
        tokio::time::sleep(poll).await;
    }
}

/// Frame driver owning the compositor and the surface.
pub struct RenderLoop<S> {
    compositor: Compositor,
    surface: S,
    stats: FrameStatsAccumulator,
    table_report: ColorTableReport,
    frame_budget: Duration,
    frame: u64,
    pacing: Option<Interval>,
}

impl<S: RenderSurface> RenderLoop<S> {
    /// Waits for the host, builds the color table and returns a ready loop.
    pub async fn start<W, R, I>(
        config: &MinimapConfig,
        world: &W,
        builder: &ColorTableBuilder<R, I>,
        surface: S,
    ) -> Self
    where
        W: WorldAccessor + ?Sized,
        R: AssetResolver,
        I: ImageSource,
    {
        let registry = wait_for_registry(world, config.timing.registry_poll()).await;
        let (table, report) = builder.build(registry).await;
        let mut this = Self::with_table(config, table, surface);
        this.table_report = report;
        this
    }

    /// Creates a loop around an already built color table.
    #[must_use]
    pub fn with_table(config: &MinimapConfig, table: ColorTable, surface: S) -> Self {
        let frame_budget = config.timing.frame_budget();
        Self {
            compositor: Compositor::new(config, table),
            surface,
            stats: FrameStatsAccumulator::new(frame_budget),
            table_report: ColorTableReport::default(),
            frame_budget,
            frame: 0,
            pacing: None,
        }
    }

    /// Renders one frame now.
    pub fn tick<W>(&mut self, world: &W) -> FrameOutcome
    where
        W: WorldAccessor + ?Sized,
    {
        self.tick_at(world, Instant::now())
    }

    /// Renders one frame with `now` as the retry clock.
    pub fn tick_at<W>(&mut self, world: &W, now: Instant) -> FrameOutcome
    where
        W: WorldAccessor + ?Sized,
    {
        let start = Instant::now();
        let outcome = self.compositor.render_frame(world, &mut self.surface, now);
        let total = start.elapsed();

        let mut stats = FrameStats {
            frame: self.frame,
            total_us: total.as_micros() as u64,
            ..FrameStats::default()
        };
        match &outcome {
            FrameOutcome::Drawn(report) => {
                stats.load_us = report.load_time.as_micros() as u64;
                stats.draw_us = report.draw_time.as_micros() as u64;
                stats.chunks_built = report.load.built as u32;
                stats.chunks_empty = report.load.empty as u32;
                stats.tiles_drawn = report.tiles_drawn;
            }
            FrameOutcome::Skipped(reason) => {
                tracing::trace!("frame {} skipped: {reason:?}", self.frame);
                stats.skipped = true;
            }
        }

        if self.stats.is_over_budget(&stats) {
            tracing::warn!(
                "minimap frame {} exceeded budget: {:.2}ms (target: {:.2}ms)",
                self.frame,
                total.as_secs_f64() * 1000.0,
                self.frame_budget.as_secs_f64() * 1000.0
            );
        }

        self.stats.record(stats);
        self.frame += 1;
        outcome
    }

    /// Waits for the next frame slot at the target frame rate.
    ///
    /// Missed slots are skipped rather than replayed.
    pub async fn wait_next_frame(&mut self) {
        let budget = self.frame_budget;
        let pacing = self.pacing.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(budget);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        pacing.tick().await;
    }

    /// Frames rendered so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Accumulated frame statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Outcome of the color table build.
    #[must_use]
    pub const fn table_report(&self) -> ColorTableReport {
        self.table_report
    }

    /// The compositor.
    #[must_use]
    pub const fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the loop, returning the surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
