//! Software surface backed by an `RgbaImage`.

use image::{Rgba, RgbaImage};
use voxmap_shared::Rgb;

use super::RenderSurface;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// In-memory square surface.
///
/// Draw calls paint the unrotated canvas. [`RasterSurface::present`] applies
/// the rotation and the circular mask to produce what the player sees.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    canvas: RgbaImage,
    rotation_deg: f32,
}

impl RasterSurface {
    /// Creates a transparent surface of `size` x `size` pixels.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            canvas: RgbaImage::new(size, size),
            rotation_deg: 0.0,
        }
    }

    /// The unrotated canvas.
    #[must_use]
    pub const fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Current rotation in degrees.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation_deg
    }

    /// Canvas rotated about its center and masked to the inscribed circle.
    #[must_use]
    pub fn present(&self) -> RgbaImage {
        let size = self.canvas.width();
        let half = size as f32 / 2.0;
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();

        RgbaImage::from_fn(size, size, |x, y| {
            let qx = x as f32 + 0.5 - half;
            let qy = y as f32 + 0.5 - half;
            if qx * qx + qy * qy > half * half {
                return TRANSPARENT;
            }
            // Inverse rotation: find the canvas pixel that lands here.
            let sx = qx * cos + qy * sin + half;
            let sy = -qx * sin + qy * cos + half;
            if sx < 0.0 || sy < 0.0 || sx >= size as f32 || sy >= size as f32 {
                return TRANSPARENT;
            }
            *self.canvas.get_pixel(sx as u32, sy as u32)
        })
    }

    fn blend(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        let [sr, sg, sb, sa] = src.0;
        match sa {
            0 => {}
            u8::MAX => self.canvas.put_pixel(x, y, src),
            _ => {
                let dst = self.canvas.get_pixel_mut(x, y);
                let a = f32::from(sa) / 255.0;
                let mix = |s: u8, d: u8| (f32::from(s) * a + f32::from(d) * (1.0 - a)).round() as u8;
                let out_a = (f32::from(sa) + f32::from(dst.0[3]) * (1.0 - a)).round() as u8;
                dst.0 = [mix(sr, dst.0[0]), mix(sg, dst.0[1]), mix(sb, dst.0[2]), out_a];
            }
        }
    }

    fn paint_where(&mut self, cx: f32, cy: f32, reach: f32, color: Rgb, inside: impl Fn(f32) -> bool) {
        let size = self.canvas.width() as f32;
        let x0 = (cx - reach).floor().max(0.0) as u32;
        let y0 = (cy - reach).floor().max(0.0) as u32;
        let x1 = (cx + reach).ceil().min(size) as u32;
        let y1 = (cy + reach).ceil().min(size) as u32;
        let pixel = Rgba(color.with_alpha(u8::MAX));

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if inside((dx * dx + dy * dy).sqrt()) {
                    self.canvas.put_pixel(x, y, pixel);
                }
            }
        }
    }
}

impl RenderSurface for RasterSurface {
    fn size(&self) -> u32 {
        self.canvas.width()
    }

    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn draw_image_scaled(&mut self, image: &RgbaImage, x: f32, y: f32, w: u32, h: u32) {
        if w == 0 || h == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let size = i64::from(self.canvas.width());
        let left = x.floor() as i64;
        let top = y.floor() as i64;

        // Clip the destination rectangle to the canvas.
        let dx0 = (-left).max(0);
        let dy0 = (-top).max(0);
        let dx1 = i64::from(w).min(size - left);
        let dy1 = i64::from(h).min(size - top);

        for dy in dy0..dy1 {
            let sy = (dy * i64::from(image.height()) / i64::from(h)) as u32;
            for dx in dx0..dx1 {
                let sx = (dx * i64::from(image.width()) / i64::from(w)) as u32;
                let src = *image.get_pixel(sx, sy);
                self.blend((left + dx) as u32, (top + dy) as u32, src);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        self.paint_where(cx, cy, radius, color, |d| d <= radius);
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgb) {
        let half = width / 2.0;
        self.paint_where(cx, cy, radius + half, color, |d| (d - radius).abs() <= half);
    }

    fn set_rotation(&mut self, degrees: f32) {
        self.rotation_deg = degrees;
    }
}
