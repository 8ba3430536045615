//! Per-frame timing and work counters.

use std::time::Duration;

/// Statistics for one minimap frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Time spent in `ensure_loaded` in microseconds.
    pub load_us: u64,
    /// Time spent drawing tiles and the marker in microseconds.
    pub draw_us: u64,
    /// Chunks built into tiles this frame.
    pub chunks_built: u32,
    /// Chunks that sampled empty this frame.
    pub chunks_empty: u32,
    /// Tiles blitted this frame.
    pub tiles_drawn: u32,
    /// The frame was skipped (host not ready).
    pub skipped: bool,
}

/// Running totals over many frames.
#[derive(Clone, Copy, Debug)]
pub struct FrameStatsAccumulator {
    /// Frames recorded, skipped ones included.
    pub frames_recorded: u64,
    /// Frames skipped because the host was not ready.
    pub frames_skipped: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of load times.
    pub load_us_sum: u64,
    /// Sum of draw times.
    pub draw_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Chunks built over all frames.
    pub chunks_built: u64,
    budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator counting frames longer than `budget` as over budget.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            frames_skipped: 0,
            total_us_sum: 0,
            load_us_sum: 0,
            draw_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            chunks_built: 0,
            budget_us: budget.as_micros() as u64,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        if stats.skipped {
            self.frames_skipped += 1;
        }
        self.total_us_sum += stats.total_us;
        self.load_us_sum += stats.load_us;
        self.draw_us_sum += stats.draw_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.chunks_built += u64::from(stats.chunks_built);

        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns true if `stats` exceeded the frame budget.
    #[must_use]
    pub const fn is_over_budget(&self, stats: &FrameStats) -> bool {
        stats.total_us > self.budget_us
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a one-line summary at `info`.
    pub fn log_summary(&self) {
        let min = if self.frames_recorded == 0 { 0 } else { self.min_frame_us };
        tracing::info!(
            "{} frames ({} skipped), avg {:.3} ms, min {:.3} ms, max {:.3} ms, {:.1}% over budget, {} chunks built",
            self.frames_recorded,
            self.frames_skipped,
            self.avg_frame_ms(),
            min as f64 / 1000.0,
            self.max_frame_us as f64 / 1000.0,
            self.over_budget_ratio() * 100.0,
            self.chunks_built
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_666))
    }
}
