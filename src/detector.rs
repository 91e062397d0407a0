// Hand landmark sources. The real model lives outside this program; these
// adapters feed the session either from the mouse or from recorded landmarks.

use crate::error::Error;
use crate::types::{
    Hand, INDEX_MCP, INDEX_TIP, LANDMARK_COUNT, Landmark, MIDDLE_MCP, MIDDLE_TIP, PINKY_TIP,
    RING_TIP, THUMB_TIP, WRIST,
};
use image::RgbImage;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Anything that can find hands in a fitted camera frame.
/// Landmarks are normalized to the frame it was given.
pub trait HandDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Hand>, Error>;
}

/// One synthetic hand driven by a pointer (mouse) position.
/// Holding the button closes thumb, index and middle tips together and curls
/// ring/pinky, which reads as a pinch, a move pinch and a pointing finger at once.
#[derive(Default)]
pub struct PointerHand {
    pointer: Option<(f32, f32)>,
    pressed: bool,
}

impl PointerHand {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pointer` is normalized to the canvas; `None` means "no hand in view".
    pub fn set_pointer(&mut self, pointer: Option<(f32, f32)>, pressed: bool) {
        self.pointer = pointer;
        self.pressed = pressed;
    }

    fn synthesize(x: f32, y: f32, pressed: bool) -> Hand {
        let mut lm = [Landmark::new(x, y + 0.12); LANDMARK_COUNT];
        lm[WRIST] = Landmark::new(x, y + 0.25);
        lm[INDEX_MCP] = Landmark::new(x, y + 0.12);
        lm[MIDDLE_MCP] = Landmark::new(x + 0.03, y + 0.12);
        lm[INDEX_TIP] = Landmark::new(x, y);
        if pressed {
            lm[THUMB_TIP] = Landmark::new(x, y);
            lm[MIDDLE_TIP] = Landmark::new(x, y + 0.01);
            lm[RING_TIP] = Landmark::new(x + 0.03, y + 0.15);
            lm[PINKY_TIP] = Landmark::new(x + 0.05, y + 0.16);
        } else {
            lm[THUMB_TIP] = Landmark::new(x - 0.15, y + 0.05);
            lm[MIDDLE_TIP] = Landmark::new(x + 0.05, y);
            lm[RING_TIP] = Landmark::new(x + 0.1, y + 0.01);
            lm[PINKY_TIP] = Landmark::new(x + 0.15, y + 0.03);
        }
        Hand::new(lm)
    }
}

impl HandDetector for PointerHand {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Hand>, Error> {
        Ok(self
            .pointer
            .map(|(x, y)| vec![Self::synthesize(x, y, self.pressed)])
            .unwrap_or_default())
    }
}

/// Replays landmarks recorded as JSON lines, one frame per call.
/// Each line is `[[[x, y], ... 21 pairs], ...one array per hand]`.
/// Past the end of input every frame has zero hands.
pub struct ReplayDetector<R> {
    lines: std::io::Lines<R>,
    frame: usize,
}

impl ReplayDetector<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        log::info!("Replaying landmarks from {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayDetector<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), frame: 0 }
    }

    fn parse_line(line: &str) -> Result<Vec<Hand>, Error> {
        let raw: Vec<Vec<[f32; 2]>> = serde_json::from_str(line)?;
        raw.into_iter()
            .map(|points| {
                let landmarks: [Landmark; LANDMARK_COUNT] = points
                    .iter()
                    .map(|&[x, y]| Landmark::new(x, y))
                    .collect::<Vec<_>>()
                    .try_into()
                    .map_err(|v: Vec<Landmark>| {
                        Error::Detector(format!(
                            "expected {LANDMARK_COUNT} landmarks per hand, got {}",
                            v.len()
                        ))
                    })?;
                Ok(Hand::new(landmarks))
            })
            .collect()
    }
}

impl<R: BufRead> HandDetector for ReplayDetector<R> {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Hand>, Error> {
        self.frame += 1;
        match self.lines.next() {
            None => Ok(Vec::new()),
            Some(line) => {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    return Ok(Vec::new());
                }
                Self::parse_line(line).map_err(|e| {
                    Error::Detector(format!("replay frame {}: {e}", self.frame))
                })
            }
        }
    }
}
