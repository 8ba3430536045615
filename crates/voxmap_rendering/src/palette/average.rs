//! Representative color extraction.
//!
//! Top-down icon art often carries a bright decorative band in one half, so
//! the image is averaged per half and the brighter half wins.

use image::RgbaImage;
use voxmap_shared::Rgb;

/// Mean RGB of rows `[y0, y1)`. Alpha is ignored. `None` for an empty region.
#[must_use]
pub fn average_region(image: &RgbaImage, y0: u32, y1: u32) -> Option<Rgb> {
    let y1 = y1.min(image.height());
    if y0 >= y1 || image.width() == 0 {
        return None;
    }

    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for y in y0..y1 {
        for x in 0..image.width() {
            let [pr, pg, pb, _] = image.get_pixel(x, y).0;
            r += u64::from(pr);
            g += u64::from(pg);
            b += u64::from(pb);
            count += 1;
        }
    }

    let mean = |sum: u64| ((sum as f64 / count as f64).round()) as u8;
    Some(Rgb::new(mean(r), mean(g), mean(b)))
}

/// Representative color of a texture: the brighter of its upper and lower halves.
///
/// Ties go to the upper half. `None` for an empty image.
#[must_use]
pub fn representative_color(image: &RgbaImage) -> Option<Rgb> {
    let mid = image.height() / 2;
    let upper = average_region(image, 0, mid);
    let lower = average_region(image, mid, image.height());

    match (upper, lower) {
        (Some(up), Some(low)) => Some(if low.luma() > up.luma() { low } else { up }),
        (up, low) => up.or(low),
    }
}
