// Landmark distance, letterboxing and weighted image blends.
// Everything here is pure: same inputs, same output image.

use crate::types::Landmark;
use image::{
    RgbImage,
    imageops::{self, FilterType},
};

/// Euclidean distance between two normalized landmarks.
#[inline]
pub fn distance(p1: Landmark, p2: Landmark) -> f32 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Scale `frame` to fit inside `target_w` x `target_h` keeping its aspect ratio,
/// then center it on black so the result is exactly the target size.
pub fn fit_frame(frame: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    let mut out = RgbImage::new(target_w, target_h);
    let (fw, fh) = frame.dimensions();
    if fw == 0 || fh == 0 || target_w == 0 || target_h == 0 {
        return out;
    }

    let scale = (target_w as f32 / fw as f32).min(target_h as f32 / fh as f32);
    let nw = ((fw as f32 * scale) as u32).clamp(1, target_w);
    let nh = ((fh as f32 * scale) as u32).clamp(1, target_h);

    let x_off = (target_w - nw) / 2;
    let y_off = (target_h - nh) / 2;
    if (nw, nh) == (fw, fh) {
        imageops::overlay(&mut out, frame, x_off as i64, y_off as i64);
    } else {
        let resized = imageops::resize(frame, nw, nh, FilterType::Triangle);
        imageops::overlay(&mut out, &resized, x_off as i64, y_off as i64);
    }
    out
}

/// `a * wa + b * wb` per channel, rounded and saturated to 0..=255.
/// Both images must share dimensions; `b` is returned unchanged otherwise.
pub fn blend_weighted(a: &RgbImage, wa: f32, b: &RgbImage, wb: f32) -> RgbImage {
    if a.dimensions() != b.dimensions() {
        log::warn!(
            "blend_weighted: size mismatch {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        );
        return b.clone();
    }
    let data: Vec<u8> = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| mix(x, wa, y, wb))
        .collect();
    // Same length as the inputs, so the buffer always fits.
    RgbImage::from_raw(a.width(), a.height(), data).unwrap_or_else(|| b.clone())
}

#[inline]
pub fn mix(x: u8, wx: f32, y: u8, wy: f32) -> u8 {
    (x as f32 * wx + y as f32 * wy).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Landmark::new(0.0, 0.0), Landmark::new(0.3, 0.4));
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fit_frame_letterboxes_wide_target() {
        // 4x4 white into 8x4: scaled to 4x4, centered with 2px black bars.
        let src = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let out = fit_frame(&src, 8, 4);
        assert_eq!(out.dimensions(), (8, 4));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(1, 3), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(2, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(5, 3), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(6, 2), &Rgb([0, 0, 0]));
    }

    #[test]
    fn fit_frame_scales_down_tall_target() {
        let src = RgbImage::from_pixel(20, 10, Rgb([10, 20, 30]));
        let out = fit_frame(&src, 10, 10);
        assert_eq!(out.dimensions(), (10, 10));
        // 20x10 -> 10x5, offset y = 2
        assert_eq!(out.get_pixel(5, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(5, 4), &Rgb([10, 20, 30]));
        assert_eq!(out.get_pixel(5, 9), &Rgb([0, 0, 0]));
    }

    #[test]
    fn blend_weighted_rounds_and_saturates() {
        let a = RgbImage::from_pixel(1, 1, Rgb([100, 255, 0]));
        let b = RgbImage::from_pixel(1, 1, Rgb([200, 255, 10]));
        let out = blend_weighted(&a, 0.6, &b, 0.4);
        assert_eq!(out.get_pixel(0, 0), &Rgb([140, 255, 4]));

        let hot = blend_weighted(&a, 1.0, &b, 1.0);
        assert_eq!(hot.get_pixel(0, 0), &Rgb([255, 255, 10]));
    }
}
