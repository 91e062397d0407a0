// Core types shared by the gesture pipeline and the window.

use image::RgbImage;

/// What the window shows: one u32 per pixel, 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A black buffer of the given size.
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pack an RGB image into 0x00RRGGBB pixels.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for px in img.pixels() {
            let [r, g, b] = px.0;
            pixels.push(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
        }
        Self { width: w as usize, height: h as usize, pixels }
    }
}

/// An RGB triple in 0..=255 per channel.
pub type Rgb = [u8; 3];

/// A pixel position on the canvas.
pub type PixelPoint = (i32, i32);

// Anatomical landmark indices reported by the hand detector.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// Bone connections used to draw a hand skeleton over the camera frame.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),         // thumb
    (0, 5), (5, 6), (6, 7), (7, 8),         // index
    (5, 9), (9, 10), (10, 11), (11, 12),    // middle
    (9, 13), (13, 14), (14, 15), (15, 16),  // ring
    (13, 17), (17, 18), (18, 19), (19, 20), // pinky
    (0, 17),                                // palm base
];

/// One normalized landmark; x and y are in [0,1] relative to the fitted frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Map to canvas pixels, clamped inside [0,w-1] x [0,h-1].
    pub fn to_pixel(&self, width: u32, height: u32) -> PixelPoint {
        let x = (self.x * width as f32) as i32;
        let y = (self.y * height as f32) as i32;
        (
            x.clamp(0, width.saturating_sub(1) as i32),
            y.clamp(0, height.saturating_sub(1) as i32),
        )
    }
}

/// The 21 landmarks of one detected hand, indexed by the constants above.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    #[inline]
    pub fn point(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }
}
