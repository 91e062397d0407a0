// Stroke rendering: anti-aliased thick segments blended into the ink layer.
// Visual: each frame a hand keeps "drawing", one more soft-edged segment appears.

use crate::geometry::{blend_weighted, mix};
use crate::types::{PixelPoint, Rgb};
use image::RgbImage;

pub const MIN_THICKNESS: u32 = 5;
pub const MAX_THICKNESS: u32 = 60;
pub const MIN_OPACITY: f32 = 0.1;
pub const MAX_OPACITY: f32 = 1.0;

/// Per-hand default colors; hand `i` draws with slot `i % 4`.
pub const DEFAULT_USER_COLORS: [Rgb; 4] = [
    [255, 0, 0],   // red
    [0, 255, 0],   // green
    [0, 0, 255],   // blue
    [255, 255, 0], // yellow
];

/// Quick-pick colors offered by the UI; picking one sets slot 0.
pub const QUICK_PALETTE: [Rgb; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [0, 255, 255],
    [255, 0, 255],
];

const INK_OFF: Rgb = [0, 0, 0];

/// Brush settings read on every paint.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushConfig {
    thickness: u32,
    opacity: f32,
    pub eraser: bool,
    colors: [Rgb; 4],
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self::new(15, 0.8, DEFAULT_USER_COLORS)
    }
}

impl BrushConfig {
    pub fn new(thickness: u32, opacity: f32, colors: [Rgb; 4]) -> Self {
        Self {
            thickness: thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
            opacity: opacity.clamp(MIN_OPACITY, MAX_OPACITY),
            eraser: false,
            colors,
        }
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_thickness(&mut self, px: u32) {
        self.thickness = px.clamp(MIN_THICKNESS, MAX_THICKNESS);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(MIN_OPACITY, MAX_OPACITY);
    }

    pub fn colors(&self) -> &[Rgb; 4] {
        &self.colors
    }

    /// Set the primary (hand 0) color.
    pub fn set_primary_color(&mut self, rgb: Rgb) {
        self.colors[0] = rgb;
    }

    pub fn reset_colors(&mut self) {
        self.colors = DEFAULT_USER_COLORS;
    }

    /// Color hand `hand_index` paints with right now (black while erasing).
    pub fn ink_for(&self, hand_index: usize) -> Rgb {
        if self.eraser {
            INK_OFF
        } else {
            self.colors[hand_index % self.colors.len()]
        }
    }
}

/// Paint one segment from `from` to `to` into `layer`.
/// The segment is drawn on a copy, then the copy is blended over the
/// original at the brush opacity, so overlapping segments build up ink gradually.
pub fn paint_segment(
    layer: &RgbImage,
    from: PixelPoint,
    to: PixelPoint,
    color: Rgb,
    brush: &BrushConfig,
) -> RgbImage {
    let mut overlay = layer.clone();
    draw_line_aa(&mut overlay, from, to, color, brush.thickness());
    let opacity = brush.opacity();
    blend_weighted(&overlay, opacity, layer, 1.0 - opacity)
}

/// Draw a round-capped line of width `thickness` with a one-pixel soft edge.
/// Coverage of each pixel center is `radius + 0.5 - distance_to_segment`, clamped to [0,1].
pub fn draw_line_aa(img: &mut RgbImage, from: PixelPoint, to: PixelPoint, color: Rgb, thickness: u32) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    if w == 0 || h == 0 {
        return;
    }
    let radius = thickness.max(1) as f32 / 2.0;
    let reach = radius.ceil() as i32 + 1;

    // Scan just the bounding box around the segment, clipped to the image.
    let x_min = (from.0.min(to.0) - reach).max(0);
    let x_max = (from.0.max(to.0) + reach).min(w - 1);
    let y_min = (from.1.min(to.1) - reach).max(0);
    let y_max = (from.1.max(to.1) + reach).min(h - 1);

    let (ax, ay) = (from.0 as f32, from.1 as f32);
    let (bx, by) = (to.0 as f32, to.1 as f32);
    let (vx, vy) = (bx - ax, by - ay);
    let len2 = vx * vx + vy * vy;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let (px, py) = (x as f32, y as f32);
            // Closest point on the segment (a dot when both ends coincide).
            let t = if len2 > 0.0 {
                (((px - ax) * vx + (py - ay) * vy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let d = (px - (ax + t * vx)).hypot(py - (ay + t * vy));
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let p = img.get_pixel_mut(x as u32, y as u32);
            if coverage >= 1.0 {
                p.0 = color;
            } else {
                for c in 0..3 {
                    p.0[c] = mix(color[c], coverage, p.0[c], 1.0 - coverage);
                }
            }
        }
    }
}
