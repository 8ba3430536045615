//! Texture resolution and loading.
//!
//! Resolution (block -> asset key) is synchronous and cheap. Loading
//! (asset key -> decoded image) is async so the color table builder can fan
//! out every texture at once.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use voxmap_shared::{BlockDef, BlockId};

use crate::error::{MinimapError, MinimapResult};

/// Maps a block definition to the location of its texture.
pub trait AssetResolver {
    /// Texture location for `def`, or `None` if nothing resolves.
    fn resolve(&self, def: &BlockDef) -> Option<String>;
}

/// Loads a texture by location.
pub trait ImageSource: Send + Sync + 'static {
    /// Fetches and decodes the image at `location`.
    fn load(&self, location: &str) -> impl Future<Output = MinimapResult<RgbaImage>> + Send;
}

/// The host's list of asset keys plus the default-path template.
///
/// Lookup order for a block:
/// 1. first key containing the texture hint (top face, generic face, name)
///    and ending in `png`
/// 2. the default template with `{id}` replaced, if that key exists
#[derive(Clone, Debug, Default)]
pub struct AssetIndex {
    keys: Vec<String>,
    default_template: String,
}

impl AssetIndex {
    /// Creates an index over `keys`, searched in the given order.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = String>, default_template: impl Into<String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            default_template: default_template.into(),
        }
    }

    /// Indexes every file under `root`, keyed by `/`-separated relative path.
    ///
    /// # Errors
    ///
    /// Returns `AssetIo` if a directory cannot be listed.
    pub fn from_dir(root: &Path, default_template: impl Into<String>) -> MinimapResult<Self> {
        let mut keys = Vec::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let entries = std::fs::read_dir(&dir).map_err(|source| MinimapError::AssetIo {
                location: dir.display().to_string(),
                source,
            })?;
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if let Ok(relative) = path.strip_prefix(root) {
                    let key: Vec<_> = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect();
                    keys.push(key.join("/"));
                }
            }
        }
        keys.sort();
        Ok(Self::new(keys, default_template))
    }

    /// Number of indexed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// First PNG key containing `hint`.
    #[must_use]
    pub fn find(&self, hint: &str) -> Option<&str> {
        self.keys
            .iter()
            .find(|key| key.contains(hint) && key.ends_with("png"))
            .map(String::as_str)
    }

    /// Default key for a block id.
    #[must_use]
    pub fn default_key(&self, id: BlockId) -> String {
        self.default_template.replace("{id}", &id.to_string())
    }
}

impl AssetResolver for AssetIndex {
    fn resolve(&self, def: &BlockDef) -> Option<String> {
        if let Some(key) = def.texture_hint().and_then(|hint| self.find(hint)) {
            return Some(key.to_owned());
        }
        let fallback = self.default_key(def.id);
        self.keys.iter().any(|k| *k == fallback).then_some(fallback)
    }
}

/// Reads textures from a directory with `tokio::fs`.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageSource for FsImageSource {
    async fn load(&self, location: &str) -> MinimapResult<RgbaImage> {
        let path = self.root.join(location);
        let bytes = tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                MinimapError::AssetNotFound(location.to_owned())
            } else {
                MinimapError::AssetIo {
                    location: location.to_owned(),
                    source,
                }
            }
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| MinimapError::ImageDecode {
            location: location.to_owned(),
            source,
        })?;
        Ok(decoded.to_rgba8())
    }
}

/// In-memory textures, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, Arc<RgbaImage>>,
}

impl MemoryImageSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an image.
    pub fn insert(&mut self, location: impl Into<String>, image: RgbaImage) {
        self.images.insert(location.into(), Arc::new(image));
    }

    /// All locations, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.images.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ImageSource for MemoryImageSource {
    async fn load(&self, location: &str) -> MinimapResult<RgbaImage> {
        self.images
            .get(location)
            .map(|image| RgbaImage::clone(image))
            .ok_or_else(|| MinimapError::AssetNotFound(location.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> AssetIndex {
        AssetIndex::new(
            [
                "blocks/grass_top.png".to_owned(),
                "blocks/grass_side.png".to_owned(),
                "blocks/stone.json".to_owned(),
                "blocks/stone_bricks.png".to_owned(),
                "defaultSurvival/renderItems/42.png".to_owned(),
            ],
            "defaultSurvival/renderItems/{id}.png",
        )
    }

    #[test]
    fn test_top_face_preferred() {
        let def = BlockDef::opaque(1, "grass").with_textures(Some("grass_top"), Some("grass_side"));
        assert_eq!(index().resolve(&def).as_deref(), Some("blocks/grass_top.png"));
    }

    #[test]
    fn test_name_fallback_skips_non_png() {
        let def = BlockDef::opaque(2, "stone");
        assert_eq!(index().resolve(&def).as_deref(), Some("blocks/stone_bricks.png"));
    }

    #[test]
    fn test_default_template_by_id() {
        let def = BlockDef::opaque(42, "mystery");
        assert_eq!(
            index().resolve(&def).as_deref(),
            Some("defaultSurvival/renderItems/42.png")
        );
    }

    #[test]
    fn test_unresolvable() {
        let def = BlockDef::opaque(43, "mystery");
        assert_eq!(index().resolve(&def), None);
    }

    #[tokio::test]
    async fn test_memory_source_missing() {
        let source = MemoryImageSource::new();
        let err = source.load("nope.png").await.unwrap_err();
        assert!(matches!(err, MinimapError::AssetNotFound(_)));
    }

    #[tokio::test]
    async fn test_fs_source_missing_file() {
        let source = FsImageSource::new(std::env::temp_dir().join("voxmap-no-such-dir"));
        let err = source.load("grass.png").await.unwrap_err();
        assert!(matches!(err, MinimapError::AssetNotFound(_)));
    }

    #[tokio::test]
    async fn test_fs_source_round_trip() {
        let dir = std::env::temp_dir().join(format!("voxmap-assets-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("blocks")).unwrap();
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join("blocks/dirt.png")).unwrap();
        std::fs::write(dir.join("blocks/broken.png"), b"not a png").unwrap();

        let index = AssetIndex::from_dir(&dir, "{id}.png").unwrap();
        assert_eq!(index.find("dirt"), Some("blocks/dirt.png"));

        let source = FsImageSource::new(&dir);
        let loaded = source.load("blocks/dirt.png").await.unwrap();
        assert_eq!(loaded.get_pixel(1, 1).0, [10, 20, 30, 255]);

        let err = source.load("blocks/broken.png").await.unwrap_err();
        assert!(matches!(err, MinimapError::ImageDecode { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
