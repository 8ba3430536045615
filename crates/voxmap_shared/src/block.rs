//! # Block Registry Types
//!
//! The host owns the block registry. The minimap only reads three flags
//! from each definition (`transparent`, `phys_transp`, `is_leaves`) plus the
//! texture hints used to pick a representative color.
//!
//! ## TOML Format
//!
//! ```toml
//! [[block]]
//! id = 1
//! name = "grass"
//! textures = { top = "grass_top", other = "grass_side" }
//!
//! [[block]]
//! id = 10
//! name = "water"
//! transparent = true
//! phys_transp = true
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Block type identifier. `0` means "no block / air / unresolved".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air / no block.
    pub const AIR: Self = Self(0);

    /// Creates a block id.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true for the "no block" sentinel.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Texture name hints attached to a block definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureHints {
    /// Texture of the top face (`YP`), preferred for a top-down map.
    #[serde(default)]
    pub top: Option<String>,
    /// Generic texture used for the remaining faces.
    #[serde(default)]
    pub other: Option<String>,
}

/// How a block behaves for surface selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceClass {
    /// Leaves. Always a surface.
    Leaves,
    /// Transparent and physically transparent. Always a surface.
    Water,
    /// Not physically transparent. Always a surface.
    Opaque,
    /// Physically transparent vegetation. Surface only when plants are shown.
    Plant,
}

impl SurfaceClass {
    /// Returns true if a block of this class stops a column walk.
    #[inline]
    #[must_use]
    pub const fn is_surface(self, show_plants: bool) -> bool {
        match self {
            Self::Leaves | Self::Water | Self::Opaque => true,
            Self::Plant => show_plants,
        }
    }
}

/// Read-only block definition, owned by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Registry id.
    pub id: BlockId,
    /// Display name, last texture-name fallback.
    #[serde(default)]
    pub name: String,
    /// Rendered see-through.
    #[serde(default)]
    pub transparent: bool,
    /// Physically transparent (non-solid looking).
    #[serde(default)]
    pub phys_transp: bool,
    /// Leaves flag.
    #[serde(default)]
    pub is_leaves: bool,
    /// Texture hints for color extraction.
    #[serde(default)]
    pub textures: TextureHints,
}

impl BlockDef {
    /// Creates a fully opaque block definition.
    #[must_use]
    pub fn opaque(id: u16, name: impl Into<String>) -> Self {
        Self {
            id: BlockId(id),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a water-like definition (transparent and physically transparent).
    #[must_use]
    pub fn water(id: u16, name: impl Into<String>) -> Self {
        Self {
            transparent: true,
            phys_transp: true,
            ..Self::opaque(id, name)
        }
    }

    /// Creates a leaves definition.
    #[must_use]
    pub fn leaves(id: u16, name: impl Into<String>) -> Self {
        Self {
            phys_transp: true,
            is_leaves: true,
            ..Self::opaque(id, name)
        }
    }

    /// Creates a plant definition (physically transparent, not water, not leaves).
    #[must_use]
    pub fn plant(id: u16, name: impl Into<String>) -> Self {
        Self {
            phys_transp: true,
            ..Self::opaque(id, name)
        }
    }

    /// Sets the texture hints.
    #[must_use]
    pub fn with_textures(mut self, top: Option<&str>, other: Option<&str>) -> Self {
        self.textures = TextureHints {
            top: top.map(str::to_owned),
            other: other.map(str::to_owned),
        };
        self
    }

    /// Returns true for water (transparent and physically transparent).
    #[inline]
    #[must_use]
    pub const fn is_water(&self) -> bool {
        self.transparent && self.phys_transp
    }

    /// Returns true for plants (physically transparent, not leaves, not water).
    #[inline]
    #[must_use]
    pub const fn is_plant(&self) -> bool {
        self.phys_transp && !self.is_leaves && !self.is_water()
    }

    /// Classifies the block for surface selection.
    #[must_use]
    pub const fn surface_class(&self) -> SurfaceClass {
        if self.is_leaves {
            SurfaceClass::Leaves
        } else if self.is_water() {
            SurfaceClass::Water
        } else if !self.phys_transp {
            SurfaceClass::Opaque
        } else {
            SurfaceClass::Plant
        }
    }

    /// Texture-name hint in lookup order: top face, generic face, display name.
    ///
    /// Returns `None` when all three are missing or empty.
    #[must_use]
    pub fn texture_hint(&self) -> Option<&str> {
        [
            self.textures.top.as_deref(),
            self.textures.other.as_deref(),
            Some(self.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|hint| !hint.is_empty())
    }
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "block")]
    blocks: Vec<BlockDef>,
}

/// Mapping `BlockId -> BlockDef`.
#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    defs: HashMap<BlockId, BlockDef>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of definitions. Later duplicates win.
    #[must_use]
    pub fn from_defs(defs: impl IntoIterator<Item = BlockDef>) -> Self {
        let mut registry = Self::new();
        for def in defs {
            registry.insert(def);
        }
        registry
    }

    /// Parses a registry from TOML (`[[block]]` tables).
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is malformed.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        let file: RegistryFile = toml::from_str(source)?;
        Ok(Self::from_defs(file.blocks))
    }

    /// Inserts or replaces a definition.
    pub fn insert(&mut self, def: BlockDef) {
        self.defs.insert(def.id, def);
    }

    /// Looks up a definition.
    #[inline]
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.defs.get(&id)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if the registry has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterates over all definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &BlockDef> {
        self.defs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(BlockDef::opaque(1, "stone").surface_class(), SurfaceClass::Opaque);
        assert_eq!(BlockDef::water(2, "water").surface_class(), SurfaceClass::Water);
        assert_eq!(BlockDef::leaves(3, "oak_leaves").surface_class(), SurfaceClass::Leaves);
        assert_eq!(BlockDef::plant(4, "tall_grass").surface_class(), SurfaceClass::Plant);
    }

    #[test]
    fn test_transparent_but_solid_is_opaque() {
        // Glass: rendered see-through but physically solid.
        let glass = BlockDef {
            transparent: true,
            ..BlockDef::opaque(20, "glass")
        };
        assert_eq!(glass.surface_class(), SurfaceClass::Opaque);
    }

    #[test]
    fn test_plants_only_when_shown() {
        assert!(!SurfaceClass::Plant.is_surface(false));
        assert!(SurfaceClass::Plant.is_surface(true));
        assert!(SurfaceClass::Water.is_surface(false));
    }

    #[test]
    fn test_texture_hint_fallback_order() {
        let def = BlockDef::opaque(1, "grass").with_textures(Some("grass_top"), Some("grass_side"));
        assert_eq!(def.texture_hint(), Some("grass_top"));

        let def = BlockDef::opaque(1, "grass").with_textures(None, Some("grass_side"));
        assert_eq!(def.texture_hint(), Some("grass_side"));

        let def = BlockDef::opaque(1, "grass");
        assert_eq!(def.texture_hint(), Some("grass"));

        let def = BlockDef::opaque(1, "");
        assert_eq!(def.texture_hint(), None);
    }

    #[test]
    fn test_registry_from_toml() {
        let registry = BlockRegistry::from_toml_str(
            r#"
            [[block]]
            id = 1
            name = "grass"
            textures = { top = "grass_top" }

            [[block]]
            id = 10
            name = "water"
            transparent = true
            phys_transp = true
            "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(BlockId(1)).unwrap().textures.top.as_deref(),
            Some("grass_top")
        );
        assert!(registry.get(BlockId(10)).unwrap().is_water());
        assert!(registry.get(BlockId(7)).is_none());
    }
}
