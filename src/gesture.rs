//! Per-hand gesture classification.
//!
//! Turns one hand's landmarks plus the current [`ModeState`] into a
//! [`GestureAction`]. Stateless: stroke continuity lives in the session.

use crate::geometry::distance;
use crate::types::{
    Hand, INDEX_TIP, MIDDLE_TIP, PINKY_TIP, PixelPoint, RING_TIP, THUMB_TIP, WRIST,
};

/// Normalized-distance threshold below which two fingertips count as pinched.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.04;

/// How a hand signals "pen down" while drawing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTrigger {
    /// Thumb tip touching index tip.
    Pinch,
    /// Index finger extended further than the other three fingers.
    Pointer,
}

impl DrawTrigger {
    pub fn label(self) -> &'static str {
        match self {
            DrawTrigger::Pinch => "Pinch",
            DrawTrigger::Pointer => "Pointer",
        }
    }
}

/// Trigger style plus which gesture family is active.
/// Draw and move are never both enabled; both may be off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    pub trigger: DrawTrigger,
    drawing_enabled: bool,
    move_enabled: bool,
}

impl Default for ModeState {
    fn default() -> Self {
        Self { trigger: DrawTrigger::Pinch, drawing_enabled: true, move_enabled: false }
    }
}

impl ModeState {
    pub fn drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    pub fn move_enabled(&self) -> bool {
        self.move_enabled
    }

    pub fn toggle_trigger(&mut self) {
        self.trigger = match self.trigger {
            DrawTrigger::Pinch => DrawTrigger::Pointer,
            DrawTrigger::Pointer => DrawTrigger::Pinch,
        };
    }

    /// Flip drawing; move takes the opposite state.
    pub fn toggle_drawing(&mut self) {
        self.drawing_enabled = !self.drawing_enabled;
        self.move_enabled = !self.drawing_enabled;
    }

    /// Flip move; drawing takes the opposite state.
    pub fn toggle_move(&mut self) {
        self.move_enabled = !self.move_enabled;
        self.drawing_enabled = !self.move_enabled;
    }

    /// Turn every gesture off (used when there is no camera).
    pub fn disable_all(&mut self) {
        self.drawing_enabled = false;
        self.move_enabled = false;
    }

    pub fn any_enabled(&self) -> bool {
        self.drawing_enabled || self.move_enabled
    }
}

/// Outcome of classifying one hand for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Drawing,
    Moving,
    Idle,
}

/// One classified hand: the action plus the index-tip position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandGesture {
    pub action: GestureAction,
    pub point: PixelPoint,
}

/// Classify `hand` under `mode`. Returns `None` when no gesture family is
/// enabled, in which case the hand is ignored entirely.
pub fn classify(
    hand: &Hand,
    mode: &ModeState,
    pinch_threshold: f32,
    canvas: (u32, u32),
) -> Option<HandGesture> {
    let action = if mode.move_enabled {
        if distance(hand.point(THUMB_TIP), hand.point(MIDDLE_TIP)) < pinch_threshold {
            GestureAction::Moving
        } else {
            GestureAction::Idle
        }
    } else if mode.drawing_enabled {
        let pen_down = match mode.trigger {
            DrawTrigger::Pinch => {
                distance(hand.point(THUMB_TIP), hand.point(INDEX_TIP)) < pinch_threshold
            }
            DrawTrigger::Pointer => index_extended(hand),
        };
        if pen_down { GestureAction::Drawing } else { GestureAction::Idle }
    } else {
        return None;
    };

    Some(HandGesture {
        action,
        point: hand.point(INDEX_TIP).to_pixel(canvas.0, canvas.1),
    })
}

/// Index tip strictly farther from the wrist than middle, ring and pinky tips.
fn index_extended(hand: &Hand) -> bool {
    let wrist = hand.point(WRIST);
    let reach = distance(hand.point(INDEX_TIP), wrist);
    [MIDDLE_TIP, RING_TIP, PINKY_TIP]
        .iter()
        .all(|&tip| reach > distance(hand.point(tip), wrist))
}
