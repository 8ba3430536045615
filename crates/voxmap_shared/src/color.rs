//! RGB colors for the block color table.

use serde::{Deserialize, Serialize};

/// 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Solid black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Solid white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Mid gray, the default fallback for blocks without a color.
    pub const GRAY: Self = Self::new(100, 100, 100);

    /// Creates a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceptual brightness (ITU-R BT.601 luma weights).
    #[must_use]
    pub fn luma(self) -> f32 {
        f32::from(self.r) * 0.299 + f32::from(self.g) * 0.587 + f32::from(self.b) * 0.114
    }

    /// RGBA bytes with the given alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}
