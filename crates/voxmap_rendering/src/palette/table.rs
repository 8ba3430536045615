//! # Color Table
//!
//! `BlockId -> Rgb`, built once and immutable afterwards.
//!
//! ## Build
//!
//! ```text
//! registry ──resolve──> locations ──spawn──> JoinSet ──join──> ColorTable
//!                            │                  (one task per texture)
//!                            └── unresolved ──> fallback
//! ```
//!
//! Every registry id ends up with an entry. Blocks whose texture did not
//! resolve, failed to load, or decoded to an empty image get the fallback.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use voxmap_shared::{BlockId, BlockRegistry, Rgb, WorldAccessor};

use super::assets::{AssetResolver, ImageSource};
use super::average::representative_color;
use crate::error::{MinimapError, MinimapResult};

/// Immutable block color lookup.
#[derive(Clone, Debug)]
pub struct ColorTable {
    colors: HashMap<BlockId, Rgb>,
    fallback: Rgb,
}

impl ColorTable {
    /// Creates an empty table; every lookup yields `fallback`.
    #[must_use]
    pub fn new(fallback: Rgb) -> Self {
        Self {
            colors: HashMap::new(),
            fallback,
        }
    }

    /// Creates a table from explicit entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (BlockId, Rgb)>, fallback: Rgb) -> Self {
        Self {
            colors: entries.into_iter().collect(),
            fallback,
        }
    }

    /// Exact entry for `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<Rgb> {
        self.colors.get(&id).copied()
    }

    /// Color to draw for `id`, falling back when there is no entry.
    #[inline]
    #[must_use]
    pub fn color_of(&self, id: BlockId) -> Rgb {
        self.get(id).unwrap_or(self.fallback)
    }

    /// The fallback color.
    #[must_use]
    pub const fn fallback(&self) -> Rgb {
        self.fallback
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Outcome counts of a table build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorTableReport {
    /// Blocks whose texture produced a color.
    pub resolved: usize,
    /// Blocks with no resolvable texture.
    pub unresolved: usize,
    /// Blocks whose texture failed to load or decode.
    pub failed: usize,
}

impl ColorTableReport {
    /// Blocks that ended up with the fallback color.
    #[must_use]
    pub const fn fallbacks(&self) -> usize {
        self.unresolved + self.failed
    }
}

/// Builds a `ColorTable` by loading every block texture concurrently.
pub struct ColorTableBuilder<R, S> {
    resolver: R,
    source: Arc<S>,
    fallback: Rgb,
}

impl<R, S> ColorTableBuilder<R, S>
where
    R: AssetResolver,
    S: ImageSource,
{
    /// Creates a builder.
    pub fn new(resolver: R, source: Arc<S>, fallback: Rgb) -> Self {
        Self {
            resolver,
            source,
            fallback,
        }
    }

    /// Builds the table for every block in `registry`.
    ///
    /// Must run inside a tokio runtime. All loads are spawned up front and
    /// joined before returning.
    pub async fn build(&self, registry: &BlockRegistry) -> (ColorTable, ColorTableReport) {
        let mut report = ColorTableReport::default();
        let mut colors = HashMap::with_capacity(registry.len());
        let mut loads = JoinSet::new();

        for def in registry.iter().filter(|def| !def.id.is_air()) {
            let Some(location) = self.resolver.resolve(def) else {
                tracing::debug!("block {} ({}): no texture resolves", def.id, def.name);
                report.unresolved += 1;
                colors.insert(def.id, self.fallback);
                continue;
            };

            let source = Arc::clone(&self.source);
            let id = def.id;
            loads.spawn(async move {
                let color = source
                    .load(&location)
                    .await
                    .map(|image| representative_color(&image));
                (id, location, color)
            });
        }

        while let Some(joined) = loads.join_next().await {
            match joined {
                Ok((id, _, Ok(Some(color)))) => {
                    report.resolved += 1;
                    colors.insert(id, color);
                }
                Ok((id, location, Ok(None))) => {
                    tracing::debug!("block {id}: texture {location} is empty");
                    report.failed += 1;
                    colors.insert(id, self.fallback);
                }
                Ok((id, _, Err(err))) => {
                    tracing::debug!("block {id}: {err}");
                    report.failed += 1;
                    colors.insert(id, self.fallback);
                }
                Err(err) => {
                    tracing::warn!("texture load task failed: {err}");
                }
            }
        }

        // A task that died takes its id with it; those blocks still get the fallback.
        for def in registry.iter().filter(|def| !def.id.is_air()) {
            if !colors.contains_key(&def.id) {
                report.failed += 1;
                colors.insert(def.id, self.fallback);
            }
        }

        tracing::info!(
            "color table built: {} resolved, {} fallback",
            report.resolved,
            report.fallbacks()
        );

        (ColorTable::from_entries(colors, self.fallback), report)
    }

    /// Builds the table from the host's registry.
    ///
    /// # Errors
    ///
    /// Returns `WorldNotReady` if the host has no registry yet.
    pub async fn build_for_world<W>(&self, world: &W) -> MinimapResult<(ColorTable, ColorTableReport)>
    where
        W: WorldAccessor + ?Sized,
    {
        let registry = world.block_registry().ok_or(MinimapError::WorldNotReady)?;
        Ok(self.build(registry).await)
    }
}
