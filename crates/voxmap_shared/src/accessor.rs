//! World Accessor - the ONLY way the minimap reads host state.
//!
//! The host is polled, never subscribed to. Every getter may return `None`
//! while the host is still streaming its world in; the minimap treats that
//! as "not yet available" and tries again next frame.

use crate::block::{BlockId, BlockRegistry};
use crate::math::Vec3;

/// Player position and heading for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// World position.
    pub position: Vec3,
    /// Heading around the vertical axis, in radians.
    pub yaw: f32,
}

impl PlayerState {
    /// Creates a player state.
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// Pull-based view of the host game's live world.
///
/// ## Usage
///
/// ```rust,ignore
/// if let Some(registry) = host.block_registry() {
///     let id = host.block_at(10, 64, -3);
///     let def = registry.get(id);
/// }
/// ```
pub trait WorldAccessor {
    /// Block registry, absent until world streaming completes.
    fn block_registry(&self) -> Option<&BlockRegistry>;

    /// Block id at a world position. `BlockId::AIR` for empty or unloaded cells.
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;

    /// Player position, absent before the player exists.
    fn player_position(&self) -> Option<Vec3>;

    /// Player yaw in radians, absent before the player exists.
    fn player_yaw(&self) -> Option<f32>;

    /// Position and yaw together, or `None` if either is missing.
    fn player_state(&self) -> Option<PlayerState> {
        Some(PlayerState::new(self.player_position()?, self.player_yaw()?))
    }
}
