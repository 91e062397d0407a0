//! Configuration file support.
//!
//! Settings are read from `~/.config/air-draw/config.toml` (or `--config`).
//! A missing file means defaults; out-of-range values are clamped with a warning.
//!
//! # Example TOML
//! ```toml
//! [camera]
//! index = 0
//! mirror = true
//!
//! [brush]
//! thickness = 20
//! opacity = 0.6
//! colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]]
//!
//! [gesture]
//! pointer_mode = true
//! ```

use crate::gesture::{DEFAULT_PINCH_THRESHOLD, DrawTrigger};
use crate::layer::DEFAULT_UNDO_CAPACITY;
use crate::session::SessionSettings;
use crate::stroke::{
    BrushConfig, DEFAULT_USER_COLORS, MAX_OPACITY, MAX_THICKNESS, MIN_OPACITY, MIN_THICKNESS,
};
use crate::types::Rgb;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub brush: BrushSettings,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Which camera to open and how to orient it.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    /// Flip horizontally so the feed behaves like a mirror
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { index: 0, width: 640, height: 480, mirror: true }
    }
}

/// Initial window size; the canvas follows the window afterwards.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 800, height: 600 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Stroke width in pixels (5 - 60)
    pub thickness: u32,
    /// Blend factor of each new segment (0.1 - 1.0)
    pub opacity: f32,
    /// One color per hand slot
    pub colors: [Rgb; 4],
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self { thickness: 15, opacity: 0.8, colors: DEFAULT_USER_COLORS }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Normalized fingertip distance that counts as a pinch (0.005 - 0.2)
    pub pinch_threshold: f32,
    /// Start with the pointing-finger trigger instead of pinch
    pub pointer_mode: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { pinch_threshold: DEFAULT_PINCH_THRESHOLD, pointer_mode: false }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frame interval in milliseconds (5 - 100)
    pub tick_interval_ms: u64,
    /// Undo snapshots kept (1 - 50)
    pub undo_capacity: usize,
    /// Where exported drawings go
    pub save_directory: PathBuf,
    /// Draw the detected hand skeleton over the camera
    pub show_landmarks: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 15,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            save_directory: PathBuf::from("."),
            show_landmarks: true,
        }
    }
}

impl Config {
    /// Default config location: `<config_dir>/air-draw/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("air-draw").join("config.toml"))
    }

    /// Load from `path`, or the default location when `None`.
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => {
                log::debug!("No config directory; using defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate_and_clamp();
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Like [`Config::load`], but a broken file only costs a warning.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e:#}; using default config");
            Self::default()
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Clamp every numeric setting into its supported range.
    pub fn validate_and_clamp(&mut self) {
        let b = &mut self.brush;
        if !(MIN_THICKNESS..=MAX_THICKNESS).contains(&b.thickness) {
            log::warn!(
                "Invalid brush thickness {}, clamping to {MIN_THICKNESS}-{MAX_THICKNESS}",
                b.thickness
            );
            b.thickness = b.thickness.clamp(MIN_THICKNESS, MAX_THICKNESS);
        }
        if !(MIN_OPACITY..=MAX_OPACITY).contains(&b.opacity) {
            log::warn!("Invalid brush opacity {:.2}, clamping to 0.1-1.0", b.opacity);
            b.opacity = b.opacity.clamp(MIN_OPACITY, MAX_OPACITY);
        }

        let g = &mut self.gesture;
        if !(0.005..=0.2).contains(&g.pinch_threshold) {
            log::warn!(
                "Invalid pinch threshold {:.3}, clamping to 0.005-0.2",
                g.pinch_threshold
            );
            g.pinch_threshold = g.pinch_threshold.clamp(0.005, 0.2);
        }

        let s = &mut self.session;
        if !(5..=100).contains(&s.tick_interval_ms) {
            log::warn!("Invalid tick interval {}ms, clamping to 5-100", s.tick_interval_ms);
            s.tick_interval_ms = s.tick_interval_ms.clamp(5, 100);
        }
        if !(1..=50).contains(&s.undo_capacity) {
            log::warn!("Invalid undo capacity {}, clamping to 1-50", s.undo_capacity);
            s.undo_capacity = s.undo_capacity.clamp(1, 50);
        }

        let c = &mut self.canvas;
        if c.width == 0 || c.height == 0 {
            log::warn!("Invalid canvas size {}x{}, using 800x600", c.width, c.height);
            *c = CanvasConfig::default();
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            brush: BrushConfig::new(self.brush.thickness, self.brush.opacity, self.brush.colors),
            trigger: if self.gesture.pointer_mode { DrawTrigger::Pointer } else { DrawTrigger::Pinch },
            pinch_threshold: self.gesture.pinch_threshold,
            undo_capacity: self.session.undo_capacity,
            mirror: self.camera.mirror,
            show_landmarks: self.session.show_landmarks,
            save_directory: self.session.save_directory.clone(),
        }
    }
}
