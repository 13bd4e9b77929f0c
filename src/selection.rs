//! The active selection and its gesture state.
//!
//! A [`Selector`] owns one normalized [`CellRange`] plus two anchors:
//! `anchor` is where pointer extension measures from, `moving_anchor` is the
//! cursor that keyboard extension (shift+arrow) walks. Setting a new cell
//! resets both; extending only ever moves the end point.

use crate::layout::{Axis, SheetLayout};
use crate::types::{CellRange, SelectionType};

/// Keyboard movement of the active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// First column of the current row
    RowFirst,
    /// Last column of the current row
    RowLast,
    /// First row of the current column
    ColFirst,
    /// Last row of the current column
    ColLast,
}

/// Where the selection is in its gesture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    Single,
    Extending,
    Autofilling,
}

#[derive(Debug, Clone)]
pub struct Selector {
    range: CellRange,
    kind: SelectionType,
    anchor: (u32, u32),
    moving_anchor: (u32, u32),
    multiple: bool,
    autofill: Option<CellRange>,
    state: SelectorState,
    last_end: Option<(u32, u32)>,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            range: CellRange::single(0, 0),
            kind: SelectionType::CellRange,
            anchor: (0, 0),
            moving_anchor: (0, 0),
            multiple: false,
            autofill: None,
            state: SelectorState::Idle,
            last_end: None,
        }
    }
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(&self) -> CellRange {
        self.range
    }

    pub fn kind(&self) -> SelectionType {
        self.kind
    }

    /// Fixed end of pointer extension; also the active cell.
    pub fn anchor(&self) -> (u32, u32) {
        self.anchor
    }

    /// Cursor walked by keyboard extension.
    pub fn moving_anchor(&self) -> (u32, u32) {
        self.moving_anchor
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn autofill_range(&self) -> Option<CellRange> {
        self.autofill
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.range.contains(row, col)
    }

    /// Collapse the selection to one cell. Indices clamp to the layout.
    /// A cell inside a merge selects the whole merge.
    pub fn set(&mut self, row: u32, col: u32, layout: &SheetLayout) {
        let (row, col) = clamp(row, col, layout);
        self.kind = SelectionType::CellRange;
        self.range = expand_merges(CellRange::single(row, col), layout);
        self.anchor = (row, col);
        self.moving_anchor = (row, col);
        self.multiple = false;
        self.autofill = None;
        self.last_end = None;
        self.state = SelectorState::Single;
    }

    /// Select whole row `row`.
    pub fn select_row(&mut self, row: u32, layout: &SheetLayout) {
        self.set(row, 0, layout);
        self.kind = SelectionType::RowRange;
        self.range = self.shaped(self.anchor, self.anchor, layout);
        self.multiple = true;
    }

    /// Select whole column `col`.
    pub fn select_column(&mut self, col: u32, layout: &SheetLayout) {
        self.set(0, col, layout);
        self.kind = SelectionType::ColumnRange;
        self.range = self.shaped(self.anchor, self.anchor, layout);
        self.multiple = true;
    }

    pub fn select_all(&mut self, layout: &SheetLayout) {
        self.set(0, 0, layout);
        self.kind = SelectionType::All;
        self.range = self.shaped(self.anchor, self.anchor, layout);
        self.multiple = true;
    }

    /// Extend from the anchor to `(row, col)`, keeping the selection kind.
    ///
    /// `moving` marks a live drag update; repeated updates to the same cell
    /// are dropped. Returns whether the range changed.
    pub fn set_end(
        &mut self,
        row: u32,
        col: u32,
        moving: bool,
        layout: &SheetLayout,
    ) -> bool {
        let end = clamp(row, col, layout);
        if moving && self.last_end == Some(end) {
            return false;
        }
        self.last_end = moving.then_some(end);
        let range = self.shaped(self.anchor, end, layout);
        let changed = range != self.range;
        self.range = range;
        self.multiple = !range.is_single();
        if self.state != SelectorState::Autofilling {
            self.state = SelectorState::Extending;
        }
        changed
    }

    /// Move the active cell, or with `extend` walk the moving anchor and
    /// extend the range to it.
    pub fn move_selection(&mut self, direction: Direction, extend: bool, layout: &SheetLayout) {
        let rows = layout.rows();
        let cols = layout.cols();
        let (mut ri, mut ci) = if extend {
            self.moving_anchor
        } else {
            self.anchor
        };
        let CellRange {
            end_row, end_col, ..
        } = self.range;

        match direction {
            Direction::Left => {
                if ci > 0 {
                    ci = cols.prev_visible(ci - 1).unwrap_or(ci);
                }
            }
            Direction::Right => {
                if ci != end_col {
                    ci = end_col;
                }
                if ci < cols.last_index() {
                    ci = cols.next_visible(ci + 1).unwrap_or(ci);
                }
            }
            Direction::Up => {
                if ri > 0 {
                    ri = rows.prev_visible(ri - 1).unwrap_or(ri);
                }
            }
            Direction::Down => {
                if ri != end_row {
                    ri = end_row;
                }
                if ri < rows.last_index() {
                    ri = rows.next_visible(ri + 1).unwrap_or(ri);
                }
            }
            Direction::RowFirst => ci = 0,
            Direction::RowLast => ci = cols.last_index(),
            Direction::ColFirst => ri = 0,
            Direction::ColLast => ri = rows.last_index(),
        }

        if extend {
            self.moving_anchor = clamp(ri, ci, layout);
            self.set_end(ri, ci, false, layout);
        } else {
            self.set(ri, ci, layout);
        }
    }

    /// Compute the autofill target for a pointer over `(row, col)`: the
    /// strip left of, above, right of, or below the range, checked in that
    /// order. Clears the target when the pointer is back inside the range.
    pub fn show_autofill(
        &mut self,
        row: u32,
        col: u32,
        layout: &SheetLayout,
    ) -> Option<CellRange> {
        let (row, col) = clamp(row, col, layout);
        let CellRange {
            start_row: sri,
            start_col: sci,
            end_row: eri,
            end_col: eci,
        } = self.range;

        self.state = SelectorState::Autofilling;
        self.autofill = if col < sci {
            Some(CellRange::new(sri, col, eri, sci - 1))
        } else if row < sri {
            Some(CellRange::new(row, sci, sri - 1, eci))
        } else if col > eci {
            Some(CellRange::new(sri, eci + 1, eri, col))
        } else if row > eri {
            Some(CellRange::new(eri + 1, sci, row, eci))
        } else {
            None
        };
        self.autofill
    }

    /// End an autofill drag, returning `(source, target)` when a target was shown.
    pub fn take_autofill(&mut self) -> Option<(CellRange, CellRange)> {
        self.release();
        self.autofill.take().map(|target| (self.range, target))
    }

    /// End the current pointer gesture.
    pub fn release(&mut self) {
        self.last_end = None;
        self.state = if self.multiple {
            SelectorState::Extending
        } else {
            SelectorState::Single
        };
    }

    /// Replace the range after the autofill collaborator filled `target`.
    pub fn union_with(&mut self, target: CellRange) {
        let (sr, sc, er, ec) = self.range.bounds();
        self.range = CellRange::new(
            sr.min(target.start_row),
            sc.min(target.start_col),
            er.max(target.end_row),
            ec.max(target.end_col),
        );
        self.multiple = !self.range.is_single();
    }

    /// Re-clamp after tracks were deleted.
    pub fn clamp_to(&mut self, layout: &SheetLayout) {
        let (r1, c1) = clamp(self.range.start_row, self.range.start_col, layout);
        let (r2, c2) = clamp(self.range.end_row, self.range.end_col, layout);
        self.range = CellRange::new(r1, c1, r2, c2);
        self.anchor = clamp(self.anchor.0, self.anchor.1, layout);
        self.moving_anchor = clamp(self.moving_anchor.0, self.moving_anchor.1, layout);
        self.multiple = !self.range.is_single();
        self.autofill = None;
    }

    fn shaped(&self, from: (u32, u32), to: (u32, u32), layout: &SheetLayout) -> CellRange {
        let last_row = layout.rows().last_index();
        let last_col = layout.cols().last_index();
        let range = CellRange::new(from.0, from.1, to.0, to.1);
        match self.kind {
            SelectionType::CellRange => expand_merges(range, layout),
            SelectionType::RowRange => CellRange::new(range.start_row, 0, range.end_row, last_col),
            SelectionType::ColumnRange => {
                CellRange::new(0, range.start_col, last_row, range.end_col)
            }
            SelectionType::All => CellRange::new(0, 0, last_row, last_col),
        }
    }
}

fn clamp(row: u32, col: u32, layout: &SheetLayout) -> (u32, u32) {
    (
        layout.axis(Axis::Row).clamp_index(row),
        layout.axis(Axis::Col).clamp_index(col),
    )
}

/// Grow a range until no merge straddles its border.
fn expand_merges(mut range: CellRange, layout: &SheetLayout) -> CellRange {
    loop {
        let mut grown = range;
        for merge in layout.merges() {
            if merge.intersects(&grown) {
                grown = CellRange::new(
                    grown.start_row.min(merge.start_row),
                    grown.start_col.min(merge.start_col),
                    grown.end_row.max(merge.end_row),
                    grown.end_col.max(merge.end_col),
                );
            }
        }
        if grown == range {
            return range;
        }
        range = grown;
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

    fn layout() -> SheetLayout {
        SheetLayout::new(
            AxisStore::new(10, 25.0, 5.0, 25.0),
            AxisStore::new(5, 100.0, 5.0, 60.0),
        )
    }

    #[test]
    fn test_set_then_extend() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(0, 0, &layout);
        assert!(sel.set_end(2, 1, true, &layout));
        assert_eq!(sel.range(), CellRange::new(0, 0, 2, 1));
        assert!(sel.is_multiple());
        assert_eq!(sel.state(), SelectorState::Extending);
    }

    #[test]
    fn test_extend_upward_normalizes() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(4, 3, &layout);
        sel.set_end(1, 0, false, &layout);
        let r = sel.range();
        assert!(r.start_row <= r.end_row && r.start_col <= r.end_col);
        assert_eq!(r, CellRange::new(1, 0, 4, 3));
        assert_eq!(sel.anchor(), (4, 3));
    }

    #[test]
    fn test_live_drag_dedupes_same_cell() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(0, 0, &layout);
        assert!(sel.set_end(1, 1, true, &layout));
        assert!(!sel.set_end(1, 1, true, &layout));
    }

    #[test]
    fn test_indices_clamp() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(99, 99, &layout);
        assert_eq!(sel.anchor(), (9, 4));
    }

    #[test]
    fn test_right_jumps_past_extended_range() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(0, 0, &layout);
        sel.set_end(0, 2, false, &layout);
        sel.move_selection(Direction::Right, false, &layout);
        assert_eq!(sel.range(), CellRange::single(0, 3));
        assert!(!sel.is_multiple());
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(0, 0, &layout);
        sel.move_selection(Direction::Left, false, &layout);
        sel.move_selection(Direction::Up, false, &layout);
        assert_eq!(sel.anchor(), (0, 0));
        sel.set(9, 4, &layout);
        sel.move_selection(Direction::Down, false, &layout);
        sel.move_selection(Direction::Right, false, &layout);
        assert_eq!(sel.anchor(), (9, 4));
    }

    #[test]
    fn test_keyboard_extension_uses_moving_anchor() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(2, 2, &layout);
        sel.move_selection(Direction::Down, true, &layout);
        sel.move_selection(Direction::Down, true, &layout);
        assert_eq!(sel.range(), CellRange::new(2, 2, 4, 2));
        assert_eq!(sel.anchor(), (2, 2));
        assert_eq!(sel.moving_anchor(), (4, 2));

        sel.move_selection(Direction::Up, true, &layout);
        assert_eq!(sel.range(), CellRange::new(2, 2, 3, 2));
    }

    #[test]
    fn test_move_skips_hidden_tracks() {
        let mut layout = layout();
        layout.rows_mut().set_hidden(1, true);
        let mut sel = Selector::new();
        sel.set(0, 0, &layout);
        sel.move_selection(Direction::Down, false, &layout);
        assert_eq!(sel.anchor(), (2, 0));
        sel.move_selection(Direction::Up, false, &layout);
        assert_eq!(sel.anchor(), (0, 0));
    }

    #[test]
    fn test_jump_directions() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(3, 2, &layout);
        sel.move_selection(Direction::RowLast, false, &layout);
        assert_eq!(sel.anchor(), (3, 4));
        sel.move_selection(Direction::ColLast, false, &layout);
        assert_eq!(sel.anchor(), (9, 4));
        sel.move_selection(Direction::ColFirst, true, &layout);
        assert_eq!(sel.range(), CellRange::new(0, 4, 9, 4));
    }

    #[test]
    fn test_row_and_column_selection() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.select_row(3, &layout);
        assert_eq!(sel.kind(), SelectionType::RowRange);
        assert_eq!(sel.range(), CellRange::new(3, 0, 3, 4));
        sel.set_end(5, 0, true, &layout);
        assert_eq!(sel.range(), CellRange::new(3, 0, 5, 4));

        sel.select_column(1, &layout);
        assert_eq!(sel.range(), CellRange::new(0, 1, 9, 1));

        sel.select_all(&layout);
        assert_eq!(sel.range(), CellRange::new(0, 0, 9, 4));
    }

    #[test]
    fn test_merges_expand_selection() {
        let mut layout = layout();
        layout.set_merges(vec![CellRange::new(1, 1, 2, 2)]);
        let mut sel = Selector::new();
        sel.set(1, 1, &layout);
        assert_eq!(sel.range(), CellRange::new(1, 1, 2, 2));
        sel.set(0, 0, &layout);
        sel.set_end(1, 1, false, &layout);
        assert_eq!(sel.range(), CellRange::new(0, 0, 2, 2));
    }

    #[test]
    fn test_autofill_priority() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(2, 2, &layout);
        sel.set_end(3, 3, false, &layout);

        assert_eq!(
            sel.show_autofill(0, 0, &layout),
            Some(CellRange::new(2, 0, 3, 1))
        );
        assert_eq!(
            sel.show_autofill(0, 2, &layout),
            Some(CellRange::new(0, 2, 1, 3))
        );
        assert_eq!(
            sel.show_autofill(6, 4, &layout),
            Some(CellRange::new(2, 4, 3, 4))
        );
        assert_eq!(
            sel.show_autofill(6, 3, &layout),
            Some(CellRange::new(4, 2, 6, 3))
        );
        assert_eq!(sel.show_autofill(3, 3, &layout), None);
        assert_eq!(sel.state(), SelectorState::Autofilling);
    }

    #[test]
    fn test_take_autofill() {
        let layout = layout();
        let mut sel = Selector::new();
        sel.set(0, 0, &layout);
        sel.show_autofill(3, 0, &layout);
        let (source, target) = sel.take_autofill().unwrap();
        assert_eq!(source, CellRange::single(0, 0));
        assert_eq!(target, CellRange::new(1, 0, 3, 0));
        assert!(sel.autofill_range().is_none());
        assert_eq!(sel.state(), SelectorState::Single);
    }
}
