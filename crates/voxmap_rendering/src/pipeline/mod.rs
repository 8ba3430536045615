//! Frame orchestration: compositor, render loop and frame statistics.

mod compositor;
mod render_loop;
mod stats;

pub use compositor::{rotation_degrees, Compositor, FrameOutcome, FrameReport, SkipReason};
pub use render_loop::{wait_for_registry, RenderLoop};
pub use stats::{FrameStats, FrameStatsAccumulator};
