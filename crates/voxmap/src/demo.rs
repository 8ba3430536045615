//! # Scripted Demo Walk
//!
//! Spawns a player in a procedural world, walks them along a slow curve
//! while chunks stream in, renders the minimap every frame and writes the
//! last frame to a PNG.
//!
//! The demo reads one TOML file. `MinimapConfig` takes the minimap
//! sections and `DemoConfig` takes the rest:
//!
//! ```toml
//! [viewport]
//! load_radius = 3
//!
//! [world]
//! seed = 42
//!
//! [streaming]
//! chunks_per_step = 6
//!
//! [walk]
//! frames = 600
//! speed = 0.4
//! ```

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxmap_procedural::{block_registry, ProceduralWorld, StreamingConfig, TerrainConfig};
use voxmap_rendering::{
    AssetIndex, ColorTableBuilder, ColorTableReport, FrameOutcome, FsImageSource, MinimapConfig, MinimapError,
    RasterSurface, RenderLoop,
};
use voxmap_shared::Vec3;

use crate::textures::procedural_textures;

/// Errors that end a demo run.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Minimap setup failed.
    #[error(transparent)]
    Minimap(#[from] MinimapError),

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for `DemoConfig`.
    #[error("failed to parse demo config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The async runtime could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),

    /// The rendered minimap could not be written.
    #[error("failed to write {path}: {source}")]
    Output {
        /// Output file.
        path: PathBuf,
        /// Underlying encoder error.
        source: image::ImageError,
    },
}

/// The scripted walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Frames to render.
    pub frames: u32,
    /// Blocks walked per frame.
    pub speed: f32,
    /// Radians turned per frame.
    pub turn_rate: f32,
    /// Spawn X.
    pub start_x: f32,
    /// Spawn Z.
    pub start_z: f32,
    /// Wait for the frame interval between frames.
    pub paced: bool,
    /// Where the last frame is written. `None` skips the write.
    pub output: Option<PathBuf>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            speed: 0.5,
            turn_rate: 0.004,
            start_x: 0.0,
            start_z: 0.0,
            paced: false,
            output: Some(PathBuf::from("voxmap_demo.png")),
        }
    }
}

/// Host-side demo configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Terrain shape.
    pub world: TerrainConfig,
    /// Host streaming behaviour.
    pub streaming: StreamingConfig,
    /// The walk.
    pub walk: WalkConfig,
}

impl DemoConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if the TOML is malformed.
    pub fn from_toml_str(source: &str) -> Result<Self, DemoError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let source = std::fs::read_to_string(path).map_err(|source| DemoError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

/// What a demo run produced.
#[derive(Debug)]
pub struct DemoSummary {
    /// Frames rendered.
    pub frames: u64,
    /// Frames that drew (were not skipped).
    pub drawn: u64,
    /// Chunk tiles in the cache at the end.
    pub tiles_cached: usize,
    /// Chunks the host generated.
    pub chunks_streamed: usize,
    /// Color table build outcome.
    pub table: ColorTableReport,
    /// The last frame, rotated and masked.
    pub image: RgbaImage,
}

/// Runs the scripted walk.
///
/// Textures come from `minimap.assets.root` when set, otherwise from the
/// in-memory stand-in set.
///
/// # Errors
///
/// Returns an error if the asset directory cannot be indexed or the output
/// cannot be written.
pub async fn run_demo(minimap: &MinimapConfig, demo: &DemoConfig) -> Result<DemoSummary, DemoError> {
    let walk = &demo.walk;
    let mut world = ProceduralWorld::new(demo.world.clone(), demo.streaming.clone());
    world.spawn_player(walk.start_x, walk.start_z, 0.0);
    world.stream_step();

    let surface = RasterSurface::new(minimap.viewport.size_px);
    let template = minimap.assets.default_template.as_str();
    let fallback = minimap.colors.fallback;
    let mut render = if let Some(root) = &minimap.assets.root {
        let index = AssetIndex::from_dir(root, template)?;
        tracing::info!("indexed {} assets under {}", index.len(), root.display());
        let builder = ColorTableBuilder::new(index, Arc::new(FsImageSource::new(root)), fallback);
        RenderLoop::start(minimap, &world, &builder, surface).await
    } else {
        let source = procedural_textures(&block_registry(), template);
        let index = AssetIndex::new(source.keys(), template);
        let builder = ColorTableBuilder::new(index, Arc::new(source), fallback);
        RenderLoop::start(minimap, &world, &builder, surface).await
    };

    let (mut x, mut z, mut yaw) = (walk.start_x, walk.start_z, 0.0f32);
    let mut drawn = 0;
    for _ in 0..walk.frames {
        yaw = (yaw + walk.turn_rate) % TAU;
        // Yaw 0 faces +Z.
        x -= yaw.sin() * walk.speed;
        z += yaw.cos() * walk.speed;

        let terrain = world.generator();
        let ground = terrain.height_at(x.floor() as i32, z.floor() as i32);
        let y = ground.max(terrain.config().sea_level) as f32 + 1.0;
        world.set_player(Vec3::new(x, y, z), yaw);
        world.stream_step();

        if matches!(render.tick(&world), FrameOutcome::Drawn(_)) {
            drawn += 1;
        }
        if walk.paced {
            render.wait_next_frame().await;
        }
    }

    render.stats().log_summary();
    let image = render.surface().present();
    if let Some(path) = &walk.output {
        image.save(path).map_err(|source| DemoError::Output {
            path: path.clone(),
            source,
        })?;
        tracing::info!("wrote {}", path.display());
    }

    Ok(DemoSummary {
        frames: render.frame_count(),
        drawn,
        tiles_cached: render.compositor().cache().len(),
        chunks_streamed: world.loaded_chunks(),
        table: render.table_report(),
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_file_splits_sections() {
        let source = r#"
            [viewport]
            load_radius = 2

            [world]
            seed = 7
            sea_level = 50

            [walk]
            frames = 12
        "#;
        let demo = DemoConfig::from_toml_str(source).unwrap();
        let minimap = MinimapConfig::from_toml_str(source).unwrap();

        assert_eq!(demo.world.seed.value(), 7);
        assert_eq!(demo.world.sea_level, 50);
        assert_eq!(demo.walk.frames, 12);
        assert_eq!(demo.streaming, StreamingConfig::default());
        assert_eq!(minimap.viewport.load_radius, 2);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(DemoConfig::from_toml_str("").unwrap(), DemoConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let err = DemoConfig::load(Path::new("/nonexistent/voxmap.toml")).unwrap_err();
        assert!(matches!(err, DemoError::ConfigIo { .. }));
    }
}
