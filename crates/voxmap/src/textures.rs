//! Stand-in block textures for the procedural world.
//!
//! Every generated block gets an 8x8 texture painted from its base color:
//! a lit top half over a shaded, speckled bottom half. Keys follow the
//! usual resource-pack layout so `AssetIndex` resolves them by hint.

use image::{Rgba, RgbaImage};
use voxmap_procedural::{base_color, blocks, WorldSeed};
use voxmap_rendering::MemoryImageSource;
use voxmap_shared::BlockRegistry;

const TEXTURE_SIZE: u32 = 8;

/// Builds an in-memory texture set for `registry`.
///
/// Bedrock is published under `default_template` only, so it resolves
/// through the default path. Flowers get no texture and draw in the
/// fallback color.
#[must_use]
pub fn procedural_textures(registry: &BlockRegistry, default_template: &str) -> MemoryImageSource {
    let mut source = MemoryImageSource::new();
    for def in registry.iter() {
        if def.id == blocks::FLOWER {
            continue;
        }
        let (Some(rgb), Some(hint)) = (base_color(def.id), def.texture_hint()) else {
            continue;
        };
        let key = if def.id == blocks::BEDROCK {
            default_template.replace("{id}", &def.id.to_string())
        } else {
            format!("assets/minecraft/textures/block/{hint}.png")
        };
        source.insert(key, paint(rgb, WorldSeed::new(u64::from(def.id.raw()))));
    }
    tracing::debug!("painted {} stand-in textures", source.keys().len());
    source
}

fn paint(rgb: [u8; 3], seed: WorldSeed) -> RgbaImage {
    let half = TEXTURE_SIZE / 2;
    RgbaImage::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |x, y| {
        if y < half {
            return Rgba([rgb[0], rgb[1], rgb[2], 255]);
        }
        // Shade between 60% and 80%.
        let speckle = (seed.hash2(x as i32, y as i32) % 5) as u16;
        let scale = 60 + speckle * 5;
        let shade = |c: u8| (u16::from(c) * scale / 100) as u8;
        Rgba([shade(rgb[0]), shade(rgb[1]), shade(rgb[2]), 255])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmap_procedural::block_registry;
    use voxmap_rendering::{AssetIndex, AssetResolver};

    const TEMPLATE: &str = "defaultSurvival/renderItems/{id}.png";

    #[test]
    fn test_every_block_but_flower_resolves() {
        let registry = block_registry();
        let source = procedural_textures(&registry, TEMPLATE);
        let index = AssetIndex::new(source.keys(), TEMPLATE);

        for def in registry.iter() {
            let resolved = index.resolve(def);
            if def.id == blocks::FLOWER {
                assert_eq!(resolved, None);
            } else {
                assert!(resolved.is_some(), "{} did not resolve", def.name);
            }
        }
        assert_eq!(
            index.resolve(registry.get(blocks::BEDROCK).unwrap()).as_deref(),
            Some("defaultSurvival/renderItems/7.png")
        );
        assert_eq!(
            index.resolve(registry.get(blocks::GRASS).unwrap()).as_deref(),
            Some("assets/minecraft/textures/block/grass_top.png")
        );
    }

    #[test]
    fn test_top_half_is_base_color() {
        let image = paint([200, 100, 50], WorldSeed::new(1));
        assert_eq!(image.get_pixel(3, 0).0, [200, 100, 50, 255]);
        let bottom = image.get_pixel(3, 7).0;
        assert!(bottom[0] < 200 && bottom[0] >= 120);
        assert_eq!(bottom[3], 255);
    }
}
