// The persistent ink layer and its bounded undo history.
// Black (0,0,0) means "no ink": the compositor just lets the camera through there.

use image::{
    RgbImage,
    imageops::{self, FilterType},
};
use std::collections::VecDeque;

pub const DEFAULT_UNDO_CAPACITY: usize = 10;

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    NothingToUndo,
}

/// Snapshots of the layer, oldest at the front. Pushing past capacity drops the oldest.
pub struct UndoHistory {
    snapshots: VecDeque<RgbImage>,
    capacity: usize,
}

impl UndoHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { snapshots: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn push(&mut self, snapshot: RgbImage) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<RgbImage> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}

/// Owns the drawing layer. Every destructive operation goes through here so a
/// snapshot always lands in history first.
pub struct LayerStore {
    layer: RgbImage,
    history: UndoHistory,
}

impl LayerStore {
    pub fn new(width: u32, height: u32, undo_capacity: usize) -> Self {
        Self {
            layer: RgbImage::new(width, height),
            history: UndoHistory::new(undo_capacity),
        }
    }

    pub fn layer(&self) -> &RgbImage {
        &self.layer
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Match the canvas size, interpolating existing ink. Returns true if resized.
    pub fn ensure_size(&mut self, width: u32, height: u32) -> bool {
        if self.layer.dimensions() == (width, height) {
            return false;
        }
        log::debug!(
            "Resizing drawing layer {:?} -> {}x{}",
            self.layer.dimensions(),
            width,
            height
        );
        self.layer = if width == 0 || height == 0 || self.layer.width() == 0 || self.layer.height() == 0 {
            RgbImage::new(width, height)
        } else {
            imageops::resize(&self.layer, width, height, FilterType::Triangle)
        };
        true
    }

    /// Save the current layer so the next mutation can be undone.
    pub fn snapshot(&mut self) {
        self.history.push(self.layer.clone());
    }

    /// Replace the layer after a paint. The caller takes the snapshot at stroke start.
    pub fn replace(&mut self, layer: RgbImage) {
        debug_assert_eq!(layer.dimensions(), self.layer.dimensions());
        self.layer = layer;
    }

    pub fn clear(&mut self) {
        self.snapshot();
        for p in self.layer.pixels_mut() {
            p.0 = [0, 0, 0];
        }
    }

    /// Shift all ink by (dx, dy); uncovered pixels become black.
    /// A snapshot is pushed even when the shift is (0, 0).
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.snapshot();
        let (w, h) = self.layer.dimensions();
        let mut out = RgbImage::new(w, h);
        for (x, y, px) in self.layer.enumerate_pixels() {
            let nx = x as i64 + dx as i64;
            let ny = y as i64 + dy as i64;
            if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                continue;
            }
            out.put_pixel(nx as u32, ny as u32, *px);
        }
        self.layer = out;
    }

    pub fn undo(&mut self) -> UndoOutcome {
        match self.history.pop() {
            Some(prev) => {
                // A snapshot taken before a resize is brought to the current size.
                let (w, h) = self.layer.dimensions();
                self.layer = prev;
                self.ensure_size(w, h);
                UndoOutcome::Restored
            }
            None => UndoOutcome::NothingToUndo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn marked(store: &mut LayerStore, x: u32, y: u32, v: u8) {
        let mut l = store.layer().clone();
        l.put_pixel(x, y, Rgb([v, v, v]));
        store.replace(l);
    }

    #[test]
    fn zero_translate_keeps_content_but_grows_history() {
        let mut store = LayerStore::new(8, 8, DEFAULT_UNDO_CAPACITY);
        marked(&mut store, 3, 3, 200);
        let before = store.layer().clone();
        store.translate(0, 0);
        store.translate(0, 0);
        assert_eq!(store.layer(), &before);
        assert_eq!(store.history_len(), 2);
    }

    #[test]
    fn translate_shifts_and_fills_black() {
        let mut store = LayerStore::new(4, 4, DEFAULT_UNDO_CAPACITY);
        marked(&mut store, 0, 0, 255);
        store.translate(2, 1);
        assert_eq!(store.layer().get_pixel(2, 1), &Rgb([255, 255, 255]));
        assert_eq!(store.layer().get_pixel(0, 0), &Rgb([0, 0, 0]));

        store.translate(-5, 0);
        assert!(store.layer().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn history_is_capped_and_evicts_oldest() {
        let mut store = LayerStore::new(4, 1, DEFAULT_UNDO_CAPACITY);
        // State k has pixel (0,0) == k. Operation k (1..=11) moves state k-1 -> k.
        for k in 1..=11u8 {
            store.snapshot();
            let mut l = store.layer().clone();
            l.put_pixel(0, 0, Rgb([k, k, k]));
            store.replace(l);
            assert!(store.history_len() <= DEFAULT_UNDO_CAPACITY);
        }
        for _ in 0..10 {
            assert_eq!(store.undo(), UndoOutcome::Restored);
        }
        // Back to the state prior to the 2nd operation, i.e. after the 1st.
        assert_eq!(store.layer().get_pixel(0, 0), &Rgb([1, 1, 1]));
        assert_eq!(store.undo(), UndoOutcome::NothingToUndo);
        assert_eq!(store.layer().get_pixel(0, 0), &Rgb([1, 1, 1]));
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut store = LayerStore::new(3, 3, DEFAULT_UNDO_CAPACITY);
        marked(&mut store, 1, 1, 9);
        let before = store.layer().clone();
        assert_eq!(store.undo(), UndoOutcome::NothingToUndo);
        assert_eq!(store.layer(), &before);
    }

    #[test]
    fn clear_is_undoable() {
        let mut store = LayerStore::new(3, 3, DEFAULT_UNDO_CAPACITY);
        marked(&mut store, 2, 2, 77);
        store.clear();
        assert!(store.layer().pixels().all(|p| p.0 == [0, 0, 0]));
        store.undo();
        assert_eq!(store.layer().get_pixel(2, 2), &Rgb([77, 77, 77]));
    }

    #[test]
    fn ensure_size_interpolates_instead_of_resetting() {
        let mut store = LayerStore::new(10, 10, DEFAULT_UNDO_CAPACITY);
        let mut l = RgbImage::new(10, 10);
        for y in 0..10 {
            for x in 0..5 {
                l.put_pixel(x, y, Rgb([255, 0, 0]));
            }
        }
        store.replace(l);
        assert!(store.ensure_size(20, 20));
        assert!(!store.ensure_size(20, 20));
        assert_eq!(store.layer().dimensions(), (20, 20));
        // Left half stays red, right half stays black.
        assert_eq!(store.layer().get_pixel(2, 10), &Rgb([255, 0, 0]));
        assert_eq!(store.layer().get_pixel(17, 10), &Rgb([0, 0, 0]));
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn undo_after_resize_matches_current_canvas() {
        let mut store = LayerStore::new(10, 10, DEFAULT_UNDO_CAPACITY);
        store.snapshot();
        let mut l = RgbImage::new(10, 10);
        l.put_pixel(0, 0, Rgb([255, 255, 255]));
        store.replace(l);
        store.ensure_size(150, 80);

        assert_eq!(store.undo(), UndoOutcome::Restored);
        assert_eq!(store.layer().dimensions(), (150, 80));
        assert!(store.layer().pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
