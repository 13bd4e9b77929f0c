//! Live resizing of rows, columns and floating objects.
//!
//! Every gesture here is a pixel-only preview: nothing touches the layout or
//! the object layer until the caller commits the final geometry.

use serde::Serialize;

use crate::layout::{Axis, SheetLayout, Viewport};
use crate::types::{CellRange, PixelRect};

/// Smallest width or height a floating object can be resized to.
pub const MIN_OBJECT_SIZE: f32 = 20.0;

/// Final geometry of a row/column resize, reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeCommit {
    pub axis: Axis,
    /// First resized track
    pub start: u32,
    /// Last resized track (inclusive)
    pub end: u32,
    pub size: f32,
}

/// Dragging the trailing border of one row or column.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackResize {
    axis: Axis,
    index: u32,
    /// View-space position of the track's leading edge at press time
    start: f32,
    original: f32,
    min: f32,
    preview: f32,
}

impl TrackResize {
    pub fn begin(axis: Axis, index: u32, layout: &SheetLayout, viewport: &Viewport) -> Self {
        let store = layout.axis(axis);
        let original = store.raw_size(index);
        Self {
            axis,
            index,
            start: layout.view_position(axis, index, viewport),
            original,
            min: store.min_size(),
            preview: original,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn original(&self) -> f32 {
        self.original
    }

    pub fn preview(&self) -> f32 {
        self.preview
    }

    /// Candidate size for a pointer at view-space `pointer` on this axis.
    pub fn update(&mut self, pointer: f32) -> f32 {
        self.preview = (pointer - self.start).max(self.min);
        self.preview
    }

    /// Apply the previewed size. When the dragged track lies inside the
    /// selection on this axis, every selected track gets the new size.
    pub fn commit(&self, layout: &mut SheetLayout, selection: &CellRange) -> ResizeCommit {
        let (sel_start, sel_end) = match self.axis {
            Axis::Row => (selection.start_row, selection.end_row),
            Axis::Col => (selection.start_col, selection.end_col),
        };
        let (start, end) = if (sel_start..=sel_end).contains(&self.index) {
            (sel_start, sel_end)
        } else {
            (self.index, self.index)
        };

        let store = layout.axis_mut(self.axis);
        let mut size = self.preview;
        for index in start..=end {
            size = store.set_size(index, self.preview);
        }
        tracing::debug!(axis = ?self.axis, start, end, size, "track resize committed");
        ResizeCommit {
            axis: self.axis,
            start,
            end,
            size,
        }
    }
}

/// Which edge of an axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    Start,
    End,
}

/// The eight resize handles around a floating object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopCenter,
        Handle::TopRight,
        Handle::MiddleLeft,
        Handle::MiddleRight,
        Handle::BottomLeft,
        Handle::BottomCenter,
        Handle::BottomRight,
    ];

    /// Dragged edge per axis as `(horizontal, vertical)`.
    fn drags(self) -> (Drag, Drag) {
        match self {
            Handle::TopLeft => (Drag::Start, Drag::Start),
            Handle::TopCenter => (Drag::None, Drag::Start),
            Handle::TopRight => (Drag::End, Drag::Start),
            Handle::MiddleLeft => (Drag::Start, Drag::None),
            Handle::MiddleRight => (Drag::End, Drag::None),
            Handle::BottomLeft => (Drag::Start, Drag::End),
            Handle::BottomCenter => (Drag::None, Drag::End),
            Handle::BottomRight => (Drag::End, Drag::End),
        }
    }

    /// Short name used by hosts (`tl`, `tc`, ... `br`).
    pub fn name(self) -> &'static str {
        match self {
            Handle::TopLeft => "tl",
            Handle::TopCenter => "tc",
            Handle::TopRight => "tr",
            Handle::MiddleLeft => "ml",
            Handle::MiddleRight => "mr",
            Handle::BottomLeft => "bl",
            Handle::BottomCenter => "bc",
            Handle::BottomRight => "br",
        }
    }

    /// Centre of the handle on `rect`.
    pub fn point(self, rect: &PixelRect) -> (f32, f32) {
        let pick = |drag: Drag, start: f32, len: f32| match drag {
            Drag::Start => start,
            Drag::None => start + len / 2.0,
            Drag::End => start + len,
        };
        let (h, v) = self.drags();
        (
            pick(h, rect.left, rect.width),
            pick(v, rect.top, rect.height),
        )
    }

    /// Handle of `rect` within `tolerance` pixels of `(x, y)`.
    pub fn hit(rect: &PixelRect, x: f32, y: f32, tolerance: f32) -> Option<Handle> {
        Self::ALL.into_iter().find(|handle| {
            let (hx, hy) = handle.point(rect);
            (x - hx).abs() <= tolerance && (y - hy).abs() <= tolerance
        })
    }
}

/// Move the dragged edge of `start..start+len` by `delta`, never letting the
/// span drop below [`MIN_OBJECT_SIZE`]. The opposite edge stays put.
fn resize_axis(start: f32, len: f32, drag: Drag, delta: f32) -> (f32, f32) {
    match drag {
        Drag::None => (start, len),
        Drag::End => {
            let edge = (start + len + delta).max(start + MIN_OBJECT_SIZE);
            (start, edge - start)
        }
        Drag::Start => {
            let fixed = start + len;
            let edge = (start + delta).min(fixed - MIN_OBJECT_SIZE);
            (edge, fixed - edge)
        }
    }
}

/// Dragging one handle of a floating object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectResize {
    id: String,
    handle: Handle,
    original: PixelRect,
    press: (f32, f32),
    preview: PixelRect,
}

impl ObjectResize {
    /// Start from the object's stored rectangle and the pointer at press time.
    pub fn begin(
        id: impl Into<String>,
        handle: Handle,
        original: PixelRect,
        x: f32,
        y: f32,
    ) -> Self {
        Self {
            id: id.into(),
            handle,
            original,
            press: (x, y),
            preview: original,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn preview(&self) -> PixelRect {
        self.preview
    }

    pub fn update(&mut self, x: f32, y: f32) -> PixelRect {
        let (h, v) = self.handle.drags();
        let o = self.original;
        let (left, width) = resize_axis(o.left, o.width, h, x - self.press.0);
        let (top, height) = resize_axis(o.top, o.height, v, y - self.press.1);
        self.preview = PixelRect::new(left, top, width, height);
        self.preview
    }
}

/// Dragging a floating object by its body.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMove {
    id: String,
    original: PixelRect,
    press: (f32, f32),
    /// Smallest left/top edge the object may reach
    start: (f32, f32),
    /// Largest right/bottom edge the object may reach
    end: (f32, f32),
    preview: PixelRect,
}

impl ObjectMove {
    /// `start` and `end` are the sheet-space edges of the visible window.
    /// An object that already sits before `start` keeps its own edge as
    /// the lower bound.
    pub fn begin(
        id: impl Into<String>,
        original: PixelRect,
        x: f32,
        y: f32,
        start: (f32, f32),
        end: (f32, f32),
    ) -> Self {
        Self {
            id: id.into(),
            original,
            press: (x, y),
            start: (start.0.min(original.left), start.1.min(original.top)),
            end,
            preview: original,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn preview(&self) -> PixelRect {
        self.preview
    }

    /// Translate by the pointer delta, keeping the object inside the window.
    pub fn update(&mut self, x: f32, y: f32) -> PixelRect {
        let o = self.original;
        let (min_left, min_top) = self.start;
        let max_left = (self.end.0 - o.width).max(min_left);
        let max_top = (self.end.1 - o.height).max(min_top);
        let left = (o.left + x - self.press.0).clamp(min_left, max_left);
        let top = (o.top + y - self.press.1).clamp(min_top, max_top);
        self.preview = PixelRect::new(left, top, o.width, o.height);
        self.preview
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
    use crate::layout::AxisStore;
    use test_case::test_case;

    fn layout() -> SheetLayout {
        SheetLayout::new(
            AxisStore::new(10, 25.0, 25.0, 25.0),
            AxisStore::new(10, 100.0, 60.0, 60.0),
        )
    }

    #[test]
    fn test_track_resize_clamps_to_min() {
        let layout = layout();
        let vp = Viewport::new(800.0, 600.0);
        let mut gesture = TrackResize::begin(Axis::Col, 1, &layout, &vp);
        // Column 1 starts at header 60 + 100
        assert_eq!(gesture.update(160.0 + 150.0), 150.0);
        assert_eq!(gesture.update(170.0), 60.0);
    }

    #[test]
    fn test_track_resize_commit_single() {
        let mut layout = layout();
        let vp = Viewport::new(800.0, 600.0);
        let mut gesture = TrackResize::begin(Axis::Row, 4, &layout, &vp);
        gesture.update(gesture.start + 40.0);
        let selection = CellRange::single(0, 0);
        let commit = gesture.commit(&mut layout, &selection);
        assert_eq!((commit.start, commit.end), (4, 4));
        assert_eq!(layout.rows().size(4), 40.0);
        assert_eq!(layout.rows().size(3), 25.0);
    }

    #[test]
    fn test_track_resize_commit_bulk() {
        let mut layout = layout();
        let vp = Viewport::new(800.0, 600.0);
        let mut gesture = TrackResize::begin(Axis::Col, 2, &layout, &vp);
        gesture.update(gesture.start + 80.0);
        let selection = CellRange::new(0, 1, 3, 3);
        let commit = gesture.commit(&mut layout, &selection);
        assert_eq!((commit.start, commit.end), (1, 3));
        for c in 1..=3 {
            assert_eq!(layout.cols().size(c), 80.0);
        }
        assert_eq!(layout.cols().size(0), 100.0);
    }

    #[test]
    fn test_handle_br_grows() {
        let rect = PixelRect::new(100.0, 50.0, 50.0, 80.0);
        let (x, y) = Handle::BottomRight.point(&rect);
        let mut gesture = ObjectResize::begin("a", Handle::BottomRight, rect, x, y);
        let out = gesture.update(x + 30.0, y + 50.0);
        assert_eq!(out, PixelRect::new(100.0, 50.0, 80.0, 130.0));
    }

    #[test]
    fn test_handle_br_clamps_to_min() {
        let rect = PixelRect::new(0.0, 0.0, 30.0, 30.0);
        let mut gesture = ObjectResize::begin("a", Handle::BottomRight, rect, 30.0, 30.0);
        let out = gesture.update(10.0, 10.0);
        assert_eq!((out.width, out.height), (20.0, 20.0));
        let out = gesture.update(-500.0, -500.0);
        assert_eq!((out.left, out.top, out.width, out.height), (0.0, 0.0, 20.0, 20.0));
    }

    #[test_case(Handle::TopLeft, -10.0, -10.0 => (90.0, 40.0, 60.0, 90.0); "top left")]
    #[test_case(Handle::TopCenter, 25.0, -10.0 => (100.0, 40.0, 50.0, 90.0); "top center ignores x")]
    #[test_case(Handle::TopRight, 10.0, 10.0 => (100.0, 60.0, 60.0, 70.0); "top right")]
    #[test_case(Handle::MiddleLeft, 10.0, 99.0 => (110.0, 50.0, 40.0, 80.0); "middle left ignores y")]
    #[test_case(Handle::MiddleRight, -10.0, 0.0 => (100.0, 50.0, 40.0, 80.0); "middle right")]
    #[test_case(Handle::BottomLeft, 100.0, 0.0 => (130.0, 50.0, 20.0, 80.0); "bottom left clamps width")]
    #[test_case(Handle::BottomCenter, 0.0, -100.0 => (100.0, 50.0, 50.0, 20.0); "bottom center clamps height")]
    #[test_case(Handle::TopLeft, 100.0, 100.0 => (130.0, 110.0, 20.0, 20.0); "top left clamps both")]
    fn test_handle_geometry(handle: Handle, dx: f32, dy: f32) -> (f32, f32, f32, f32) {
        let rect = PixelRect::new(100.0, 50.0, 50.0, 80.0);
        let (x, y) = handle.point(&rect);
        let mut gesture = ObjectResize::begin("a", handle, rect, x, y);
        let out = gesture.update(x + dx, y + dy);
        (out.left, out.top, out.width, out.height)
    }

    #[test]
    fn test_handle_hit() {
        let rect = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(Handle::hit(&rect, 98.0, 101.0, 4.0), Some(Handle::BottomRight));
        assert_eq!(Handle::hit(&rect, 50.0, -2.0, 4.0), Some(Handle::TopCenter));
        assert_eq!(Handle::hit(&rect, 50.0, 50.0, 4.0), None);
    }

    #[test]
    fn test_object_move_clamps_to_bounds() {
        let rect = PixelRect::new(10.0, 10.0, 100.0, 50.0);
        let mut gesture = ObjectMove::begin("a", rect, 20.0, 20.0, (0.0, 0.0), (300.0, 200.0));
        assert_eq!(gesture.update(50.0, 40.0), PixelRect::new(40.0, 30.0, 100.0, 50.0));
        assert_eq!(gesture.update(-100.0, -100.0).left, 0.0);
        let far = gesture.update(1000.0, 1000.0);
        assert_eq!((far.left, far.top), (200.0, 150.0));
    }

    #[test]
    fn test_object_move_clamps_to_scrolled_window() {
        let rect = PixelRect::new(0.0, 1100.0, 100.0, 50.0);
        let mut gesture =
            ObjectMove::begin("a", rect, 10.0, 1110.0, (0.0, 1000.0), (964.0, 1743.0));
        assert_eq!(gesture.update(10.0, 610.0).top, 1000.0);
        assert_eq!(gesture.update(10.0, 5000.0).top, 1693.0);
    }

    #[test]
    fn test_object_move_keeps_offscreen_start() {
        let rect = PixelRect::new(0.0, 900.0, 100.0, 50.0);
        let mut gesture =
            ObjectMove::begin("a", rect, 10.0, 910.0, (0.0, 1000.0), (964.0, 1743.0));
        assert_eq!(gesture.update(10.0, 0.0).top, 900.0);
        assert_eq!(gesture.update(10.0, 1010.0).top, 1000.0);
    }
}
