//! # Rendering Surface
//!
//! The drawable region the compositor paints into. The host decides what a
//! surface is (a window overlay, a texture, an image on disk); the core only
//! needs the operations below.
//!
//! ## Coordinates
//!
//! Pixels, origin top-left, x right, y down. The rotation is a presentation
//! transform about the surface center: draw calls are NOT rotated.

mod raster;

pub use raster::RasterSurface;

use image::RgbaImage;
use voxmap_shared::Rgb;

/// Fixed-size square drawing target.
pub trait RenderSurface {
    /// Side length in pixels.
    fn size(&self) -> u32;

    /// Clears every pixel to transparent.
    fn clear(&mut self);

    /// Draws `image` scaled to `w` x `h` pixels with its top-left at `(x, y)`.
    fn draw_image_scaled(&mut self, image: &RgbaImage, x: f32, y: f32, w: u32, h: u32);

    /// Fills a circle.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);

    /// Outlines a circle with a band `width` pixels wide centred on its edge.
    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgb);

    /// Sets the whole-surface rotation, clockwise, in degrees.
    fn set_rotation(&mut self, degrees: f32);
}
