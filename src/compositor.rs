//! Camera + ink compositing and PNG export of the last composite.

use crate::error::Error;
use crate::geometry::blend_weighted;
use chrono::Local;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Weight of the camera frame in the composite.
pub const CAMERA_WEIGHT: f32 = 0.6;
/// Weight of the drawing layer in the composite.
pub const INK_WEIGHT: f32 = 0.4;

const FILENAME_TEMPLATE: &str = "drawing_%Y%m%d_%H%M%S";
const FORMAT: &str = "png";

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    NothingToSave,
}

/// Blends the camera under the ink and keeps the latest result for export.
#[derive(Default)]
pub struct Compositor {
    last: Option<RgbImage>,
}

impl Compositor {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// `camera * 0.6 + layer * 0.4`. The result is retained for [`Compositor::save`].
    pub fn compose(&mut self, camera: &RgbImage, layer: &RgbImage) -> &RgbImage {
        let combined = blend_weighted(camera, CAMERA_WEIGHT, layer, INK_WEIGHT);
        self.last.insert(combined)
    }

    pub fn last(&self) -> Option<&RgbImage> {
        self.last.as_ref()
    }

    /// Write the last composite to `directory` as `drawing_<timestamp>.png`.
    pub fn save(&self, directory: &Path) -> Result<SaveOutcome, Error> {
        let Some(img) = self.last.as_ref() else {
            return Ok(SaveOutcome::NothingToSave);
        };

        if !directory.exists() {
            log::info!("Creating save directory: {}", directory.display());
            fs::create_dir_all(directory)?;
        }

        let path = directory.join(generate_filename());
        log::info!(
            "Saving drawing to: {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        img.save_with_format(&path, image::ImageFormat::Png)?;
        Ok(SaveOutcome::Saved(path))
    }
}

/// `drawing_YYYYMMDD_HHMMSS.png` for the current local time.
pub fn generate_filename() -> String {
    format!("{}.{}", Local::now().format(FILENAME_TEMPLATE), FORMAT)
}
