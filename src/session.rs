//! The per-frame session controller.
//!
//! [`SessionState`] owns the drawing layer, undo history, brush, modes and
//! per-hand stroke state. The host calls [`SessionState::tick`] once per frame
//! and [`SessionState::apply`] for every UI command in between ticks.

use crate::camera::FrameSource;
use crate::compositor::{Compositor, SaveOutcome};
use crate::detector::HandDetector;
use crate::error::Error;
use crate::gesture::{
    DEFAULT_PINCH_THRESHOLD, DrawTrigger, GestureAction, HandGesture, ModeState, classify,
};
use crate::geometry::fit_frame;
use crate::layer::{DEFAULT_UNDO_CAPACITY, LayerStore, UndoOutcome};
use crate::stroke::{BrushConfig, QUICK_PALETTE, draw_line_aa, paint_segment};
use crate::types::{HAND_CONNECTIONS, Hand, PixelPoint, Rgb};
use image::{RgbImage, imageops};
use std::collections::HashMap;
use std::path::PathBuf;

const SKELETON_BONE: Rgb = [255, 255, 255];
const SKELETON_JOINT: Rgb = [255, 48, 48];

/// A failure that aborts one tick. The loop reports it and carries on.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("camera unavailable")]
    CameraUnavailable,

    #[error("frame read failed: {0}")]
    FrameRead(#[source] Error),
}

impl TickError {
    /// Text shown in the status line for this failure.
    pub fn status_text(&self) -> &'static str {
        match self {
            TickError::CameraUnavailable => "Cannot open camera",
            TickError::FrameRead(_) => "Camera read error",
        }
    }
}

/// What one successful tick saw and did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Hands the detector reported (0 on detector failure).
    pub hands: usize,
    /// One entry per hand in detector order; `None` when no gesture mode is on.
    pub gestures: Vec<Option<HandGesture>>,
}

/// Stroke continuity for one hand slot (detector output position, not identity).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandState {
    pub previous_draw_point: Option<PixelPoint>,
    pub previous_move_point: Option<PixelPoint>,
}

/// UI input applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleTrigger,
    ToggleEraser,
    ToggleDrawing,
    ToggleMove,
    Clear,
    Undo,
    Save,
    AdjustThickness(i32),
    AdjustOpacity(f32),
    PickColor(Rgb),
    QuickColor(usize),
    ResetColors,
}

/// Startup settings for a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub brush: BrushConfig,
    pub trigger: DrawTrigger,
    pub pinch_threshold: f32,
    pub undo_capacity: usize,
    pub mirror: bool,
    pub show_landmarks: bool,
    pub save_directory: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            brush: BrushConfig::default(),
            trigger: DrawTrigger::Pinch,
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            mirror: true,
            show_landmarks: true,
            save_directory: PathBuf::from("."),
        }
    }
}

pub struct SessionState {
    store: LayerStore,
    compositor: Compositor,
    brush: BrushConfig,
    mode: ModeState,
    hands: HashMap<usize, HandState>,
    pinch_threshold: f32,
    mirror: bool,
    show_landmarks: bool,
    save_directory: PathBuf,
    camera_available: bool,
    status: String,
}

impl SessionState {
    pub fn new(width: u32, height: u32, settings: SessionSettings) -> Self {
        let mut mode = ModeState::default();
        if settings.trigger != mode.trigger {
            mode.toggle_trigger();
        }
        Self {
            store: LayerStore::new(width, height, settings.undo_capacity),
            compositor: Compositor::new(),
            brush: settings.brush,
            mode,
            hands: HashMap::new(),
            pinch_threshold: settings.pinch_threshold,
            mirror: settings.mirror,
            show_landmarks: settings.show_landmarks,
            save_directory: settings.save_directory,
            camera_available: true,
            status: String::from("Ready"),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    #[cfg(test)]
    pub fn layer(&self) -> &RgbImage {
        self.store.layer()
    }

    pub fn history_len(&self) -> usize {
        self.store.history_len()
    }

    pub fn last_composite(&self) -> Option<&RgbImage> {
        self.compositor.last()
    }

    /// Color of the last rendered frame at window pixel (x, y).
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgb> {
        self.compositor.last()?.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Show host-side messages (startup fallbacks) in the status line.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    #[cfg(test)]
    pub fn hand_state(&self, index: usize) -> Option<&HandState> {
        self.hands.get(&index)
    }

    /// Called once at startup when the camera could not be opened.
    /// Gestures are switched off; the UI keeps running.
    pub fn mark_camera_unavailable(&mut self) {
        self.camera_available = false;
        self.mode.disable_all();
        self.status = TickError::CameraUnavailable.status_text().to_string();
    }

    /// Surface a failed tick in the status line.
    pub fn record_failure(&mut self, err: &TickError) {
        self.status = err.status_text().to_string();
    }

    /// Run one frame: resize, read, fit, detect, draw/move, composite.
    pub fn tick(
        &mut self,
        canvas: (u32, u32),
        source: &mut dyn FrameSource,
        detector: &mut dyn HandDetector,
    ) -> Result<FrameOutcome, TickError> {
        let (width, height) = canvas;
        self.store.ensure_size(width, height);

        if !self.camera_available {
            return Err(TickError::CameraUnavailable);
        }

        let mut raw = source.next_frame().map_err(TickError::FrameRead)?;
        if self.mirror {
            imageops::flip_horizontal_in_place(&mut raw);
        }
        let mut frame = fit_frame(&raw, width, height);

        let hands = detector.detect(&frame).unwrap_or_else(|e| {
            log::warn!("Hand detection failed, treating as no hands: {e}");
            Vec::new()
        });

        let mut gestures = Vec::with_capacity(hands.len());
        if hands.is_empty() {
            self.hands.clear();
            self.status = String::from("No hand detected");
        } else if self.mode.any_enabled() {
            self.status = format!("{} hand(s) detected", hands.len());
            for (index, hand) in hands.iter().enumerate() {
                let gesture = classify(hand, &self.mode, self.pinch_threshold, canvas);
                if let Some(g) = gesture {
                    self.apply_gesture(index, g);
                }
                gestures.push(gesture);
            }
        } else {
            self.status = String::from("Hands detected, drawing/move disabled");
            gestures.resize(hands.len(), None);
        }
        log::debug!("{} hand(s), gestures {:?}", hands.len(), gestures);

        if self.show_landmarks && self.mode.any_enabled() {
            for hand in &hands {
                draw_skeleton(&mut frame, hand);
            }
        }
        self.compositor.compose(&frame, self.store.layer());

        Ok(FrameOutcome { hands: hands.len(), gestures })
    }

    fn apply_gesture(&mut self, index: usize, gesture: HandGesture) {
        let state = self.hands.entry(index).or_default();
        let point = gesture.point;
        match gesture.action {
            GestureAction::Drawing => match state.previous_draw_point {
                None => {
                    // Stroke start: one snapshot per stroke, nothing painted yet.
                    log::debug!("Hand {index} stroke start at {point:?}");
                    self.store.snapshot();
                    state.previous_draw_point = Some(point);
                }
                Some(prev) => {
                    let color = self.brush.ink_for(index);
                    let painted = paint_segment(self.store.layer(), prev, point, color, &self.brush);
                    self.store.replace(painted);
                    state.previous_draw_point = Some(point);
                }
            },
            GestureAction::Moving => {
                if let Some((x0, y0)) = state.previous_move_point {
                    let (dx, dy) = (point.0 - x0, point.1 - y0);
                    if dx != 0 || dy != 0 {
                        log::debug!("Hand {index} moved drawing by ({dx}, {dy})");
                        self.store.translate(dx, dy);
                    }
                }
                state.previous_move_point = Some(point);
            }
            GestureAction::Idle => {
                if self.mode.move_enabled() {
                    state.previous_move_point = None;
                } else {
                    state.previous_draw_point = None;
                }
            }
        }
    }

    /// Apply one UI command immediately. Returns the new status text.
    pub fn apply(&mut self, command: Command) -> &str {
        self.status = match command {
            Command::ToggleTrigger => {
                self.mode.toggle_trigger();
                format!("Mode: {}", self.mode.trigger.label())
            }
            Command::ToggleEraser => {
                self.brush.eraser = !self.brush.eraser;
                format!("Eraser: {}", on_off(self.brush.eraser))
            }
            Command::ToggleDrawing => {
                self.mode.toggle_drawing();
                format!(
                    "Draw: {}, Move: {}",
                    on_off(self.mode.drawing_enabled()),
                    on_off(self.mode.move_enabled())
                )
            }
            Command::ToggleMove => {
                self.mode.toggle_move();
                format!(
                    "Move: {}, Draw: {}",
                    on_off(self.mode.move_enabled()),
                    on_off(self.mode.drawing_enabled())
                )
            }
            Command::Clear => {
                self.store.clear();
                String::from("Canvas cleared")
            }
            Command::Undo => match self.store.undo() {
                UndoOutcome::Restored => String::from("Undo performed"),
                UndoOutcome::NothingToUndo => String::from("Nothing to undo"),
            },
            Command::Save => match self.compositor.save(&self.save_directory) {
                Ok(SaveOutcome::Saved(path)) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    format!("Saved: {name}")
                }
                Ok(SaveOutcome::NothingToSave) => String::from("Nothing to save"),
                Err(e) => {
                    log::error!("Failed to save drawing: {e}");
                    format!("Save failed: {e}")
                }
            },
            Command::AdjustThickness(step) => {
                let px = (self.brush.thickness() as i32 + step).max(0) as u32;
                self.brush.set_thickness(px);
                format!("Brush size: {}", self.brush.thickness())
            }
            Command::AdjustOpacity(step) => {
                self.brush.set_opacity(self.brush.opacity() + step);
                format!("Opacity: {:.1}", self.brush.opacity())
            }
            Command::PickColor(rgb) => {
                self.brush.set_primary_color(rgb);
                String::from("Color updated")
            }
            Command::QuickColor(slot) => match QUICK_PALETTE.get(slot) {
                Some(&rgb) => {
                    self.brush.set_primary_color(rgb);
                    String::from("Color changed")
                }
                None => String::from("No such palette color"),
            },
            Command::ResetColors => {
                self.brush.reset_colors();
                String::from("Colors reset to default")
            }
        };
        log::debug!("{command:?} -> {}", self.status);
        &self.status
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Draw bones and joints of `hand` onto the camera frame (never onto the ink layer).
fn draw_skeleton(frame: &mut RgbImage, hand: &Hand) {
    let (w, h) = frame.dimensions();
    let px = |i: usize| hand.point(i).to_pixel(w, h);
    for &(a, b) in HAND_CONNECTIONS.iter() {
        draw_line_aa(frame, px(a), px(b), SKELETON_BONE, 2);
    }
    for i in 0..hand.landmarks.len() {
        let p = px(i);
        draw_line_aa(frame, p, p, SKELETON_JOINT, 5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::tests::{open_hand, pinch_hand};
    use crate::types::{Landmark, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP};
    use image::Rgb as Px;
    use std::collections::VecDeque;

    const CANVAS: (u32, u32) = (100, 100);

    /// Serves black frames, or a read error when told to.
    struct ScriptedCamera {
        failures: VecDeque<bool>,
    }

    impl ScriptedCamera {
        fn ok() -> Self {
            Self { failures: VecDeque::new() }
        }
    }

    impl FrameSource for ScriptedCamera {
        fn next_frame(&mut self) -> Result<RgbImage, Error> {
            if self.failures.pop_front().unwrap_or(false) {
                return Err(Error::CameraFrame("unplugged".into()));
            }
            Ok(RgbImage::new(CANVAS.0, CANVAS.1))
        }
    }

    /// Returns the queued frame results in order, then zero hands.
    struct ScriptedHands {
        frames: VecDeque<Result<Vec<Hand>, Error>>,
    }

    impl ScriptedHands {
        fn new() -> Self {
            Self { frames: VecDeque::new() }
        }

        fn push(&mut self, hands: Vec<Hand>) -> &mut Self {
            self.frames.push_back(Ok(hands));
            self
        }
    }

    impl HandDetector for ScriptedHands {
        fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Hand>, Error> {
            self.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn session() -> SessionState {
        let settings = SessionSettings {
            brush: BrushConfig::new(5, 1.0, crate::stroke::DEFAULT_USER_COLORS),
            show_landmarks: false,
            mirror: false,
            ..SessionSettings::default()
        };
        SessionState::new(CANVAS.0, CANVAS.1, settings)
    }

    fn pen(x: f32, y: f32) -> Hand {
        pinch_hand(x, y, 0.0)
    }

    fn lifted(x: f32, y: f32) -> Hand {
        open_hand(x, y)
    }

    fn run(s: &mut SessionState, det: &mut ScriptedHands, ticks: usize) {
        let mut cam = ScriptedCamera::ok();
        for _ in 0..ticks {
            s.tick(CANVAS, &mut cam, det).unwrap();
        }
    }

    #[test]
    fn stroke_start_snapshots_once_then_paints() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.2, 0.5)]);
        run(&mut s, &mut det, 1);
        assert_eq!(s.history_len(), 1);
        assert!(s.layer().pixels().all(|p| p.0 == [0, 0, 0]));

        det.push(vec![pen(0.6, 0.5)]).push(vec![pen(0.6, 0.8)]);
        run(&mut s, &mut det, 2);
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.layer().get_pixel(40, 50), &Px([255, 0, 0]));
        assert_eq!(s.layer().get_pixel(60, 70), &Px([255, 0, 0]));
        assert_eq!(s.hand_state(0).unwrap().previous_draw_point, Some((60, 80)));

        det.push(vec![lifted(0.6, 0.8)]);
        run(&mut s, &mut det, 1);
        assert_eq!(s.hand_state(0).unwrap().previous_draw_point, None);

        // A new stroke costs a new snapshot; undo removes only that stroke.
        det.push(vec![pen(0.1, 0.1)]).push(vec![pen(0.1, 0.3)]);
        run(&mut s, &mut det, 2);
        assert_eq!(s.history_len(), 2);
        assert_eq!(s.layer().get_pixel(10, 20), &Px([255, 0, 0]));
        assert_eq!(s.apply(Command::Undo), "Undo performed");
        assert_eq!(s.layer().get_pixel(10, 20), &Px([0, 0, 0]));
        assert_eq!(s.layer().get_pixel(40, 50), &Px([255, 0, 0]));
    }

    #[test]
    fn two_hands_draw_independently() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.1, 0.2), pen(0.1, 0.7)])
            .push(vec![pen(0.3, 0.2), pen(0.3, 0.7)])
            // Hand 0 lifts; hand 1 keeps going.
            .push(vec![lifted(0.3, 0.2), pen(0.5, 0.7)]);
        run(&mut s, &mut det, 3);

        assert_eq!(s.hand_state(0).unwrap().previous_draw_point, None);
        assert_eq!(s.hand_state(1).unwrap().previous_draw_point, Some((50, 70)));
        assert_eq!(s.layer().get_pixel(20, 20), &Px([255, 0, 0]));
        assert_eq!(s.layer().get_pixel(20, 70), &Px([0, 255, 0]));
        assert_eq!(s.layer().get_pixel(45, 70), &Px([0, 255, 0]));
        // One snapshot per stroke start, none for the continuation.
        assert_eq!(s.history_len(), 2);
    }

    #[test]
    fn zero_hands_clears_all_hand_state() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.1, 0.1), pen(0.5, 0.5)]).push(vec![]);
        run(&mut s, &mut det, 1);
        assert!(s.hand_state(1).is_some());
        run(&mut s, &mut det, 1);
        assert!(s.hand_state(0).is_none() && s.hand_state(1).is_none());
        assert_eq!(s.status(), "No hand detected");
    }

    #[test]
    fn detector_failure_counts_as_no_hands() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.1, 0.1)]);
        det.frames.push_back(Err(Error::Detector("model crashed".into())));
        run(&mut s, &mut det, 1);
        let mut cam = ScriptedCamera::ok();
        let outcome = s.tick(CANVAS, &mut cam, &mut det).unwrap();
        assert_eq!(outcome.hands, 0);
        assert!(s.hand_state(0).is_none());
        assert!(s.last_composite().is_some());
    }

    #[test]
    fn frame_read_failure_aborts_only_that_tick() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        let mut cam = ScriptedCamera { failures: VecDeque::from([true, false]) };

        let err = s.tick(CANVAS, &mut cam, &mut det).unwrap_err();
        assert!(matches!(err, TickError::FrameRead(_)));
        s.record_failure(&err);
        assert_eq!(s.status(), "Camera read error");
        assert!(s.last_composite().is_none());

        s.tick(CANVAS, &mut cam, &mut det).unwrap();
        assert!(s.last_composite().is_some());
    }

    #[test]
    fn missing_camera_disables_gestures() {
        let mut s = session();
        s.mark_camera_unavailable();
        assert_eq!(s.status(), "Cannot open camera");
        assert!(!s.mode().any_enabled());

        let mut det = ScriptedHands::new();
        let mut cam = ScriptedCamera::ok();
        let err = s.tick(CANVAS, &mut cam, &mut det).unwrap_err();
        assert!(matches!(err, TickError::CameraUnavailable));
    }

    #[test]
    fn hands_ignored_when_no_mode_enabled() {
        let mut s = session();
        s.mode.disable_all();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.2, 0.2)]);
        let mut cam = ScriptedCamera::ok();
        let outcome = s.tick(CANVAS, &mut cam, &mut det).unwrap();
        assert_eq!(outcome.gestures, vec![None]);
        assert_eq!(s.status(), "Hands detected, drawing/move disabled");
        assert_eq!(s.history_len(), 0);
    }

    fn grab(x: f32, y: f32) -> Hand {
        let mut hand = open_hand(x, y);
        hand.landmarks[THUMB_TIP] = hand.landmarks[MIDDLE_TIP];
        hand
    }

    #[test]
    fn move_gesture_translates_layer_by_delta() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.2, 0.2)]).push(vec![pen(0.2, 0.4)]);
        run(&mut s, &mut det, 2);
        assert_eq!(s.layer().get_pixel(20, 30), &Px([255, 0, 0]));

        assert_eq!(s.apply(Command::ToggleMove), "Move: ON, Draw: OFF");
        let before = s.history_len();
        det.push(vec![grab(0.5, 0.5)])
            .push(vec![grab(0.5, 0.5)])
            .push(vec![grab(0.7, 0.6)]);
        run(&mut s, &mut det, 3);
        // First grab only anchors; a zero delta moves nothing.
        assert_eq!(s.history_len(), before + 1);
        assert_eq!(s.layer().get_pixel(40, 40), &Px([255, 0, 0]));
        assert_eq!(s.layer().get_pixel(20, 30), &Px([0, 0, 0]));

        det.push(vec![lifted(0.7, 0.6)]);
        run(&mut s, &mut det, 1);
        assert_eq!(s.hand_state(0).unwrap().previous_move_point, None);
    }

    #[test]
    fn mode_switch_keeps_history_and_hand_state() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.2, 0.2)]);
        run(&mut s, &mut det, 1);
        s.apply(Command::ToggleTrigger);
        s.apply(Command::ToggleEraser);
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.hand_state(0).unwrap().previous_draw_point, Some((20, 20)));
        assert_eq!(s.mode().trigger, DrawTrigger::Pointer);
        assert!(s.brush().eraser);
    }

    #[test]
    fn resize_keeps_ink_and_maps_new_strokes() {
        let mut s = session();
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.1, 0.5)]).push(vec![pen(0.4, 0.5)]);
        run(&mut s, &mut det, 2);

        let big = (200, 200);
        let mut cam = ScriptedCamera::ok();
        det.push(vec![lifted(0.5, 0.5)]);
        s.tick(big, &mut cam, &mut det).unwrap();
        assert_eq!(s.layer().dimensions(), big);
        assert_eq!(s.last_composite().unwrap().dimensions(), big);
        // Old ink is scaled with the canvas.
        assert_eq!(s.layer().get_pixel(50, 100).0[0], 255);

        det.push(vec![pen(0.75, 0.25)]).push(vec![pen(0.75, 0.4)]);
        s.tick(big, &mut cam, &mut det).unwrap();
        s.tick(big, &mut cam, &mut det).unwrap();
        assert_eq!(s.layer().get_pixel(150, 65), &Px([255, 0, 0]));
    }

    #[test]
    fn save_and_undo_report_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        s.save_directory = dir.path().to_path_buf();

        assert_eq!(s.apply(Command::Undo), "Nothing to undo");
        assert_eq!(s.apply(Command::Save), "Nothing to save");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let mut det = ScriptedHands::new();
        run(&mut s, &mut det, 1);
        let status = s.apply(Command::Save).to_string();
        assert!(status.starts_with("Saved: drawing_"), "{status}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn brush_and_color_commands() {
        let mut s = session();
        assert_eq!(s.apply(Command::AdjustThickness(100)), "Brush size: 60");
        assert_eq!(s.apply(Command::AdjustThickness(-5)), "Brush size: 55");
        assert_eq!(s.apply(Command::AdjustOpacity(-0.5)), "Opacity: 0.5");
        assert_eq!(s.apply(Command::AdjustOpacity(-1.0)), "Opacity: 0.1");

        s.apply(Command::QuickColor(4));
        assert_eq!(s.brush().colors()[0], [0, 255, 255]);
        assert_eq!(s.apply(Command::PickColor([9, 8, 7])), "Color updated");
        assert_eq!(s.brush().ink_for(0), [9, 8, 7]);
        assert_eq!(s.apply(Command::ResetColors), "Colors reset to default");
        assert_eq!(s.brush().ink_for(0), [255, 0, 0]);
    }

    #[test]
    fn landmarks_show_on_composite_not_layer() {
        let mut s = session();
        s.show_landmarks = true;
        let mut det = ScriptedHands::new();
        let mut hand = lifted(0.5, 0.5);
        hand.landmarks[0] = Landmark::new(0.5, 0.9);
        det.push(vec![hand]);
        run(&mut s, &mut det, 1);
        assert!(s.layer().pixels().all(|p| p.0 == [0, 0, 0]));
        assert!(s.last_composite().unwrap().pixels().any(|p| p.0 != [0, 0, 0]));
    }

    #[test]
    fn landmarks_hidden_when_gestures_disabled() {
        let mut s = session();
        s.show_landmarks = true;
        s.mode.disable_all();
        let mut det = ScriptedHands::new();
        det.push(vec![lifted(0.5, 0.5)]);
        run(&mut s, &mut det, 1);
        assert!(s.last_composite().unwrap().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    fn pointing(x: f32, y: f32) -> Hand {
        let mut hand = open_hand(x, y);
        hand.landmarks[MIDDLE_TIP] = Landmark::new(x, y + 0.2);
        hand.landmarks[RING_TIP] = Landmark::new(x + 0.02, y + 0.22);
        hand.landmarks[PINKY_TIP] = Landmark::new(x + 0.04, y + 0.23);
        hand
    }

    #[test]
    fn pointer_mode_strokes_and_idle_resets_pen() {
        let mut s = session();
        assert_eq!(s.apply(Command::ToggleTrigger), "Mode: Pointer");
        let mut det = ScriptedHands::new();
        det.push(vec![pointing(0.2, 0.2)]).push(vec![pointing(0.5, 0.2)]);
        run(&mut s, &mut det, 2);
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.layer().get_pixel(35, 20), &Px([255, 0, 0]));
        assert_eq!(s.hand_state(0).unwrap().previous_draw_point, Some((50, 20)));

        // Middle finger farther out than the index: no longer pointing.
        det.push(vec![open_hand(0.5, 0.2)]);
        run(&mut s, &mut det, 1);
        assert_eq!(s.hand_state(0).unwrap().previous_draw_point, None);
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn color_at_samples_last_frame() {
        let mut s = session();
        assert_eq!(s.color_at(5, 5), None);
        let mut det = ScriptedHands::new();
        det.push(vec![pen(0.1, 0.5)]).push(vec![pen(0.9, 0.5)]);
        run(&mut s, &mut det, 2);
        // Full-opacity red ink at 40% over a black camera frame.
        let rgb = s.color_at(50, 50).unwrap();
        assert_eq!(rgb, [102, 0, 0]);
        assert_eq!(s.color_at(CANVAS.0, 0), None);
        s.apply(Command::PickColor(rgb));
        assert_eq!(s.brush().ink_for(0), [102, 0, 0]);
    }
}
