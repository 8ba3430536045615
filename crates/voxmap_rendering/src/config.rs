//! # Minimap Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! [viewport]
//! size_px = 200
//! view_radius = 50.0
//! load_radius = 3
//! render_radius = 4
//! show_plants = false
//!
//! [colors]
//! fallback = { r = 100, g = 100, b = 100 }
//!
//! [cache]
//! retry_delay_ms = 1000
//! capacity = 0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use voxmap_shared::{ChunkCoord, Rgb, CHUNK_SIZE};

use crate::error::{MinimapError, MinimapResult};

/// Viewport geometry and surface-selection rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Side of the square viewport, in pixels.
    pub size_px: u32,
    /// World-unit radius of the visible area around the player.
    pub view_radius: f32,
    /// Chunks (Chebyshev radius) built around the player.
    pub load_radius: u32,
    /// Chunks (Chebyshev radius) drawn around the player.
    pub render_radius: u32,
    /// Column walks start this far above the player's Y.
    pub scan_offset: f32,
    /// Count thin vegetation as surface.
    pub show_plants: bool,
    /// Radius of the player marker, in pixels.
    pub marker_radius_px: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            size_px: 200,
            view_radius: 50.0,
            load_radius: 3,
            render_radius: 4,
            scan_offset: 20.0,
            show_plants: false,
            marker_radius_px: 4.0,
        }
    }
}

impl ViewportConfig {
    /// Pixels per world block.
    #[inline]
    #[must_use]
    pub fn block_size_px(&self) -> f32 {
        self.block_size_for(self.size_px)
    }

    /// Pixels per world block on a surface `size_px` wide.
    #[inline]
    #[must_use]
    pub fn block_size_for(&self, size_px: u32) -> f32 {
        size_px as f32 / (self.view_radius * 2.0)
    }

    /// Pixel side of one drawn chunk tile, rounded up by one pixel so
    /// neighbouring tiles overlap instead of leaving seams.
    #[inline]
    #[must_use]
    pub fn tile_draw_px(&self) -> u32 {
        self.tile_draw_for(self.size_px)
    }

    /// Tile side on a surface `size_px` wide. Saturates instead of overflowing.
    #[inline]
    #[must_use]
    pub fn tile_draw_for(&self, size_px: u32) -> u32 {
        let side = (CHUNK_SIZE as f32 * self.block_size_for(size_px)).ceil() as u32;
        side.saturating_add(1)
    }
}

/// Colors used by the color table and the compositor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Color for blocks whose texture did not resolve or failed to load.
    pub fallback: Rgb,
    /// Player marker fill.
    pub marker_fill: Rgb,
    /// Player marker outline.
    pub marker_stroke: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            fallback: Rgb::GRAY,
            marker_fill: Rgb::WHITE,
            marker_stroke: Rgb::BLACK,
        }
    }
}

/// Chunk tile cache policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long an empty chunk waits before it may be sampled again.
    pub retry_delay_ms: u64,
    /// Maximum ready tiles kept. `0` keeps every tile for the session.
    pub capacity: usize,
    /// Maximum chunk builds per frame. `0` builds the whole window at once.
    pub max_builds_per_frame: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 1000,
            capacity: 0,
            max_builds_per_frame: 0,
        }
    }
}

impl CacheConfig {
    /// Retry delay as a `Duration`.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Where block textures come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding texture files. `None` uses in-memory textures.
    pub root: Option<PathBuf>,
    /// Last-resort asset key, `{id}` is replaced by the block id.
    pub default_template: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: None,
            default_template: "defaultSurvival/renderItems/{id}.png".to_owned(),
        }
    }
}

/// Frame pacing and host polling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Target frames per second.
    pub target_fps: u32,
    /// Interval between registry polls while the host is loading.
    pub registry_poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            registry_poll_ms: 100,
        }
    }
}

impl TimingConfig {
    /// Frame budget derived from the target FPS.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    /// Registry poll interval as a `Duration`.
    #[must_use]
    pub const fn registry_poll(&self) -> Duration {
        Duration::from_millis(self.registry_poll_ms)
    }
}

/// Complete minimap configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Viewport geometry.
    pub viewport: ViewportConfig,
    /// Colors.
    pub colors: ColorConfig,
    /// Tile cache policy.
    pub cache: CacheConfig,
    /// Texture sources.
    pub assets: AssetConfig,
    /// Frame pacing.
    pub timing: TimingConfig,
}

impl MinimapConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or values are invalid.
    pub fn from_toml_str(source: &str) -> MinimapResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> MinimapResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| MinimapError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges and cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> MinimapResult<()> {
        let vp = &self.viewport;
        if vp.size_px == 0 {
            return Err(MinimapError::InvalidConfig("viewport.size_px must be > 0".into()));
        }
        if !(vp.view_radius.is_finite() && vp.view_radius > 0.0) {
            return Err(MinimapError::InvalidConfig(format!(
                "viewport.view_radius must be positive, got {}",
                vp.view_radius
            )));
        }
        // One block may not be wider than the whole viewport.
        if vp.block_size_px() > vp.size_px as f32 {
            return Err(MinimapError::InvalidConfig(format!(
                "viewport.view_radius {} leaves less than one block in view",
                vp.view_radius
            )));
        }
        if !vp.scan_offset.is_finite() {
            return Err(MinimapError::InvalidConfig("viewport.scan_offset must be finite".into()));
        }
        if !(vp.marker_radius_px.is_finite() && vp.marker_radius_px >= 0.0) {
            return Err(MinimapError::InvalidConfig(
                "viewport.marker_radius_px must be >= 0".into(),
            ));
        }
        let window = ChunkCoord::window_len(vp.render_radius.max(vp.load_radius));
        if self.cache.capacity != 0 && self.cache.capacity < window {
            return Err(MinimapError::InvalidConfig(format!(
                "cache.capacity {} cannot hold the {window}-chunk window",
                self.cache.capacity
            )));
        }
        if self.timing.target_fps == 0 {
            return Err(MinimapError::InvalidConfig("timing.target_fps must be > 0".into()));
        }
        if !self.assets.default_template.contains("{id}") {
            return Err(MinimapError::InvalidConfig(
                "assets.default_template must contain {id}".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = MinimapConfig::from_toml_str("").unwrap();
        assert_eq!(config, MinimapConfig::default());
        assert_eq!(config.viewport.size_px, 200);
        assert_eq!(config.colors.fallback, Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_partial_override() {
        let config = MinimapConfig::from_toml_str(
            r#"
            [viewport]
            show_plants = true
            load_radius = 2

            [colors]
            fallback = { r = 255, g = 0, b = 0 }
            "#,
        )
        .unwrap();
        assert!(config.viewport.show_plants);
        assert_eq!(config.viewport.load_radius, 2);
        assert_eq!(config.viewport.render_radius, 4);
        assert_eq!(config.colors.fallback, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_block_size() {
        let vp = ViewportConfig::default();
        assert!((vp.block_size_px() - 2.0).abs() < f32::EPSILON);
        assert_eq!(vp.tile_draw_px(), 33);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(MinimapConfig::from_toml_str("[viewport]\nsize_px = 0").is_err());
        assert!(MinimapConfig::from_toml_str("[viewport]\nview_radius = -1.0").is_err());
        assert!(MinimapConfig::from_toml_str("[viewport]\nview_radius = 1e-7").is_err());
        assert!(MinimapConfig::from_toml_str("[viewport]\nview_radius = 0.4").is_err());
        assert!(MinimapConfig::from_toml_str("[viewport]\nview_radius = 0.5").is_ok());
        assert!(MinimapConfig::from_toml_str("[timing]\ntarget_fps = 0").is_err());
        assert!(MinimapConfig::from_toml_str("[assets]\ndefault_template = \"x.png\"").is_err());
    }

    #[test]
    fn test_tile_size_saturates() {
        let vp = ViewportConfig {
            view_radius: 1e-7,
            ..ViewportConfig::default()
        };
        assert_eq!(vp.tile_draw_px(), u32::MAX);
        assert_eq!(ViewportConfig::default().tile_draw_for(100), 17);
    }

    #[test]
    fn test_capacity_must_cover_window() {
        // render_radius 4 => 81 chunks
        let err = MinimapConfig::from_toml_str("[cache]\ncapacity = 80").unwrap_err();
        assert!(matches!(err, MinimapError::InvalidConfig(_)));
        assert!(MinimapConfig::from_toml_str("[cache]\ncapacity = 81").is_ok());
    }

    #[test]
    fn test_malformed_toml() {
        let err = MinimapConfig::from_toml_str("[viewport\n").unwrap_err();
        assert!(matches!(err, MinimapError::ConfigParse(_)));
    }
}
