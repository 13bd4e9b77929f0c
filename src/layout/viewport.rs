//! Viewport state management for scrolling.
//!
//! Scroll offsets are measured in pixels past the frozen region, so an
//! offset of 0 shows the first unfrozen track right after the frozen ones.
//! Each axis also keeps the first visible unfrozen track (the anchor) and
//! how far into that track the viewport starts (the sub-pixel offset).

use super::tracks::{Axis, AxisStore};
use super::SheetLayout;
use crate::types::{CellRange, SelectionType};

/// Scroll state of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisScroll {
    /// Pixels scrolled past the frozen region
    pub offset: f32,
    /// First track (at or after the freeze boundary) intersecting the scrolled region
    pub anchor: u32,
    /// Pixels of the anchor track scrolled out of view
    pub sub_pixel: f32,
}

impl AxisScroll {
    /// Recompute anchor and sub-pixel offset for a new scroll offset by
    /// walking forward or backward from the current anchor.
    fn settle(&mut self, store: &AxisStore, frozen: u32, offset: f32) {
        let pos = store.offset(frozen) + offset;
        let last = store.last_index();
        let mut anchor = self.anchor.clamp(frozen.min(last), last);
        while anchor < last && pos >= store.offset(anchor) + store.size(anchor) {
            anchor += 1;
        }
        while anchor > frozen && pos < store.offset(anchor) {
            anchor -= 1;
        }
        self.offset = offset;
        self.anchor = anchor;
        self.sub_pixel = (pos - store.offset(anchor)).max(0.0);
    }
}

/// Viewport state - represents the visible area of the grid
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Viewport width in pixels (row headers included)
    pub width: f32,
    /// Viewport height in pixels (column headers included)
    pub height: f32,
    rows: AxisScroll,
    cols: AxisScroll,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    /// Create an unscrolled viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            rows: AxisScroll::default(),
            cols: AxisScroll::default(),
        }
    }

    /// Resize the viewport and re-clamp scroll against the layout.
    pub fn resize(&mut self, width: f32, height: f32, layout: &SheetLayout) {
        self.width = width;
        self.height = height;
        self.clamp_scroll(layout);
    }

    pub fn axis_scroll(&self, axis: Axis) -> AxisScroll {
        match axis {
            Axis::Row => self.rows,
            Axis::Col => self.cols,
        }
    }

    fn axis_scroll_mut(&mut self, axis: Axis) -> &mut AxisScroll {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Col => &mut self.cols,
        }
    }

    /// Pixels scrolled on `axis`.
    pub fn scroll(&self, axis: Axis) -> f32 {
        self.axis_scroll(axis).offset
    }

    /// Horizontal scroll offset
    pub fn scroll_x(&self) -> f32 {
        self.cols.offset
    }

    /// Vertical scroll offset
    pub fn scroll_y(&self) -> f32 {
        self.rows.offset
    }

    /// `(row, col)` of the first scrolled track on each axis.
    pub fn anchor(&self) -> (u32, u32) {
        (self.rows.anchor, self.cols.anchor)
    }

    /// `(x, y)` sub-pixel offsets into the anchor tracks.
    pub fn sub_pixel(&self) -> (f32, f32) {
        (self.cols.sub_pixel, self.rows.sub_pixel)
    }

    /// Visible pixel size along `axis`, headers included.
    pub fn visible_size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Row => self.height,
            Axis::Col => self.width,
        }
    }

    /// Pixels available to scrolled tracks (headers and frozen tracks removed).
    pub fn scrollable_size(&self, axis: Axis, layout: &SheetLayout) -> f32 {
        let store = layout.axis(axis);
        (self.visible_size(axis) - store.header_size() - layout.frozen_extent(axis)).max(0.0)
    }

    /// Largest valid scroll offset; 0 when the content fits.
    pub fn max_scroll(&self, axis: Axis, layout: &SheetLayout) -> f32 {
        let scrollable_content = layout.axis(axis).total() - layout.frozen_extent(axis);
        (scrollable_content - self.scrollable_size(axis, layout)).max(0.0)
    }

    /// Set an absolute scroll offset, clamped. Returns the applied delta.
    pub fn set_scroll(&mut self, axis: Axis, offset: f32, layout: &SheetLayout) -> f32 {
        let max = self.max_scroll(axis, layout);
        let target = offset.clamp(0.0, max);
        let store = layout.axis(axis);
        let frozen = layout.frozen_count(axis);
        let scroll = self.axis_scroll_mut(axis);
        let before = scroll.offset;
        scroll.settle(store, frozen, target);
        target - before
    }

    /// Scroll by `delta` pixels, clamped. Returns the applied delta.
    pub fn move_by(&mut self, axis: Axis, delta: f32, layout: &SheetLayout) -> f32 {
        let current = self.scroll(axis);
        self.set_scroll(axis, current + delta, layout)
    }

    /// Re-clamp both axes after the layout or viewport size changed.
    pub fn clamp_scroll(&mut self, layout: &SheetLayout) {
        for axis in [Axis::Row, Axis::Col] {
            let current = self.scroll(axis);
            self.set_scroll(axis, current, layout);
        }
    }

    /// Scroll the minimum amount needed for tracks `start..=end` to be visible.
    ///
    /// Trailing overflow scrolls forward by exactly the overflow; a leading
    /// edge hidden behind the frozen region scrolls back to align it.
    /// Tracks that are entirely frozen are always visible.
    pub fn ensure_visible_axis(
        &mut self,
        axis: Axis,
        start: u32,
        end: u32,
        layout: &SheetLayout,
    ) -> bool {
        let frozen = layout.frozen_count(axis);
        if end < frozen {
            return false;
        }
        let store = layout.axis(axis);
        let extent = layout.frozen_extent(axis);
        let lead = store.offset(start.max(frozen));
        let trail = store.offset(end.saturating_add(1));
        let window_start = extent + self.scroll(axis);
        let window_end = window_start + self.scrollable_size(axis, layout);

        let target = if trail > window_end {
            self.scroll(axis) + (trail - window_end)
        } else if lead < window_start {
            lead - extent
        } else {
            return false;
        };
        self.set_scroll(axis, target, layout).abs() > f32::EPSILON
    }

    /// Keep a selected range visible. Whole-row/column axes are left alone.
    pub fn ensure_visible(
        &mut self,
        range: &CellRange,
        kind: SelectionType,
        layout: &SheetLayout,
    ) -> bool {
        let mut moved = false;
        if !kind.whole_rows() {
            moved |= self.ensure_visible_axis(Axis::Row, range.start_row, range.end_row, layout);
        }
        if !kind.whole_cols() {
            moved |= self.ensure_visible_axis(Axis::Col, range.start_col, range.end_col, layout);
        }
        moved
    }

    /// Get visible scrollable row range (inclusive) based on current scroll position.
    pub fn visible_rows(&self, layout: &SheetLayout) -> (u32, u32) {
        self.visible_tracks(Axis::Row, layout)
    }

    /// Get visible scrollable column range (inclusive) based on current scroll position.
    pub fn visible_cols(&self, layout: &SheetLayout) -> (u32, u32) {
        self.visible_tracks(Axis::Col, layout)
    }

    fn visible_tracks(&self, axis: Axis, layout: &SheetLayout) -> (u32, u32) {
        let store = layout.axis(axis);
        let scroll = self.axis_scroll(axis);
        let start_pos = layout.frozen_extent(axis) + scroll.offset;
        let end = store.index_at(start_pos + self.scrollable_size(axis, layout));
        (scroll.anchor, end.max(scroll.anchor))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn layout(rows: u32, cols: u32) -> SheetLayout {
        SheetLayout::new(
            AxisStore::new(rows, 20.0, 5.0, 0.0),
            AxisStore::new(cols, 50.0, 5.0, 0.0),
        )
    }

    #[test]
    fn test_move_updates_anchor_and_sub_pixel() {
        let layout = layout(100, 20);
        let mut vp = Viewport::new(400.0, 200.0);
        assert_eq!(vp.move_by(Axis::Row, 45.0, &layout), 45.0);
        assert_eq!(vp.anchor().0, 2);
        assert_eq!(vp.sub_pixel().1, 5.0);

        vp.move_by(Axis::Row, -30.0, &layout);
        assert_eq!(vp.scroll_y(), 15.0);
        assert_eq!(vp.anchor().0, 0);
        assert_eq!(vp.sub_pixel().1, 15.0);
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let layout = layout(100, 20);
        let mut vp = Viewport::new(400.0, 200.0);
        vp.move_by(Axis::Row, 1.0e6, &layout);
        assert_eq!(vp.scroll_y(), 2000.0 - 200.0);
        vp.move_by(Axis::Row, -1.0e6, &layout);
        assert_eq!(vp.scroll_y(), 0.0);
    }

    #[test]
    fn test_small_content_never_scrolls() {
        let layout = layout(3, 2);
        let mut vp = Viewport::new(400.0, 200.0);
        assert_eq!(vp.move_by(Axis::Col, 50.0, &layout), 0.0);
        assert_eq!(vp.max_scroll(Axis::Row, &layout), 0.0);
    }

    #[test]
    fn test_anchor_never_enters_frozen_region() {
        let mut layout = layout(100, 20);
        layout.set_freeze(3, 0);
        let mut vp = Viewport::new(400.0, 200.0);
        vp.move_by(Axis::Row, 10.0, &layout);
        assert_eq!(vp.anchor().0, 3);
        assert_eq!(vp.sub_pixel().1, 10.0);
    }

    #[test]
    fn test_ensure_visible_forward_and_back() {
        let layout = layout(100, 20);
        let mut vp = Viewport::new(400.0, 200.0);

        // Row 12 spans 240..260; window is 0..200
        assert!(vp.ensure_visible_axis(Axis::Row, 12, 12, &layout));
        assert_eq!(vp.scroll_y(), 60.0);

        // Already visible
        assert!(!vp.ensure_visible_axis(Axis::Row, 5, 5, &layout));

        // Row 1 starts at 20, before the window
        assert!(vp.ensure_visible_axis(Axis::Row, 1, 1, &layout));
        assert_eq!(vp.scroll_y(), 20.0);
    }

    #[test]
    fn test_visible_rows() {
        let layout = layout(100, 20);
        let mut vp = Viewport::new(400.0, 200.0);
        vp.set_scroll(Axis::Row, 100.0, &layout);
        assert_eq!(vp.visible_rows(&layout), (5, 15));
    }
}
