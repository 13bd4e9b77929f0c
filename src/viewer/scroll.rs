//! Wheel, touch and programmatic scrolling for `GridView`.

use super::GridView;
use crate::layout::Axis;
use crate::store::{CellStore, GridObserver};

/// How a wheel event with both deltas set picks its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelAxis {
    /// The larger absolute delta wins; an exact tie scrolls vertically.
    #[default]
    Dominant,
    /// Always vertical unless the vertical delta is zero.
    PreferVertical,
}

impl WheelAxis {
    /// Axis and direction (`true` = forward) for a wheel delta.
    pub fn pick(self, dx: f32, dy: f32) -> Option<(Axis, bool)> {
        let horizontal = match self {
            WheelAxis::Dominant => dx.abs() > dy.abs(),
            WheelAxis::PreferVertical => dy == 0.0 && dx != 0.0,
        };
        if horizontal {
            Some((Axis::Col, dx > 0.0))
        } else if dy != 0.0 {
            Some((Axis::Row, dy > 0.0))
        } else {
            None
        }
    }
}

impl<S: CellStore, O: GridObserver> GridView<S, O> {
    pub fn set_wheel_axis(&mut self, policy: WheelAxis) {
        self.wheel_axis = policy;
    }

    /// Scroll one track per wheel notch.
    ///
    /// Forward scrolling brings the next track to the leading edge; backward
    /// scrolling first realigns a partly hidden anchor track, then steps to
    /// the previous visible track.
    pub fn on_wheel(&mut self, dx: f32, dy: f32) -> bool {
        let Some((axis, forward)) = self.wheel_axis.pick(dx, dy) else {
            return false;
        };
        let store = self.layout.axis(axis);
        let scroll = self.viewport.axis_scroll(axis);
        let step = if forward {
            store.size(scroll.anchor) - scroll.sub_pixel
        } else if scroll.sub_pixel > 0.0 {
            -scroll.sub_pixel
        } else {
            let frozen = self.layout.frozen_count(axis);
            match scroll.anchor.checked_sub(1).filter(|&i| i >= frozen) {
                Some(prev) => -store.prev_visible(prev).map_or(0.0, |i| store.size(i)),
                None => 0.0,
            }
        };
        self.scroll_by(axis, step)
    }

    /// Follow a touch slide: content moves with the finger on the dominant axis.
    pub fn on_touch_move(&mut self, dx: f32, dy: f32) -> bool {
        if dx.abs() > dy.abs() {
            self.scroll_by(Axis::Col, -dx)
        } else {
            self.scroll_by(Axis::Row, -dy)
        }
    }

    /// Scroll by a pixel delta. Returns whether anything moved.
    pub fn scroll_by(&mut self, axis: Axis, delta: f32) -> bool {
        if delta == 0.0 {
            return false;
        }
        let applied = self.viewport.move_by(axis, delta, &self.layout);
        self.after_scroll(applied)
    }

    /// Scroll to an absolute offset past the frozen panes.
    pub fn scroll_to(&mut self, axis: Axis, offset: f32) -> bool {
        let applied = self.viewport.set_scroll(axis, offset, &self.layout);
        self.after_scroll(applied)
    }

    /// Bring the active cell back into view.
    pub fn scroll_to_selection(&mut self) -> bool {
        let (row, col) = self.selector.moving_anchor();
        if !self.scroll_into_view(row, col) {
            return false;
        }
        self.render();
        true
    }

    fn after_scroll(&mut self, applied: f32) -> bool {
        if applied.abs() <= f32::EPSILON {
            return false;
        }
        tracing::trace!(applied, "scrolled");
        self.reposition_objects();
        self.render();
        true
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
    use test_case::test_case;

    #[test_case(3.0, 10.0 => Some((Axis::Row, true)); "vertical dominant")]
    #[test_case(-10.0, 3.0 => Some((Axis::Col, false)); "horizontal dominant")]
    #[test_case(5.0, -5.0 => Some((Axis::Row, false)); "tie goes vertical")]
    #[test_case(0.0, 0.0 => None; "no delta")]
    fn test_dominant_policy(dx: f32, dy: f32) -> Option<(Axis, bool)> {
        WheelAxis::Dominant.pick(dx, dy)
    }

    #[test]
    fn test_prefer_vertical_policy() {
        assert_eq!(
            WheelAxis::PreferVertical.pick(50.0, 1.0),
            Some((Axis::Row, true))
        );
        assert_eq!(
            WheelAxis::PreferVertical.pick(50.0, 0.0),
            Some((Axis::Col, true))
        );
    }
}
