//! # Column Sampler
//!
//! Walks one world column downward and returns the first block that counts
//! as a visible map surface.
//!
//! ## Surface Rule
//!
//! | Class  | Stops the walk          |
//! |--------|-------------------------|
//! | Opaque | always                  |
//! | Water  | always                  |
//! | Leaves | always                  |
//! | Plant  | only with `show_plants` |
//!
//! Air and ids with no registry entry are skipped. An unresolved id is the
//! host still streaming data in, not an error.

use voxmap_shared::{BlockId, BlockRegistry, WorldAccessor, WORLD_FLOOR_Y};

/// Result of one column walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSample {
    /// Surface block, `BlockId::AIR` when nothing was found.
    pub block: BlockId,
    /// Y of the surface block. Meaningless when `found` is false.
    pub height: i32,
    /// True when a surface block was found above the world floor.
    pub found: bool,
}

impl ColumnSample {
    /// The "nothing down to the floor" result.
    pub const NOT_FOUND: Self = Self {
        block: BlockId::AIR,
        height: WORLD_FLOOR_Y - 1,
        found: false,
    };

    /// A surface hit.
    #[inline]
    #[must_use]
    pub const fn hit(block: BlockId, height: i32) -> Self {
        Self {
            block,
            height,
            found: true,
        }
    }
}

/// Finds the surface block of world column `(x, z)`.
///
/// The walk starts at `floor(start_y)` and descends while `y >= 0`.
#[must_use]
pub fn sample_column<W>(
    world: &W,
    registry: &BlockRegistry,
    x: i32,
    z: i32,
    start_y: f32,
    show_plants: bool,
) -> ColumnSample
where
    W: WorldAccessor + ?Sized,
{
    let mut y = start_y.floor() as i32;
    while y >= WORLD_FLOOR_Y {
        let id = world.block_at(x, y, z);
        if !id.is_air() {
            if let Some(def) = registry.get(id) {
                if def.surface_class().is_surface(show_plants) {
                    return ColumnSample::hit(id, y);
                }
            }
        }
        y -= 1;
    }
    ColumnSample::NOT_FOUND
}
