//! Pixel ↔ cell mapping for a sheet.
//!
//! Three pixel spaces are in play:
//! - *axis space*: cumulative track offsets, starting at 0 for the first track
//! - *sheet space*: axis space on both axes (headers excluded, no scroll)
//! - *view space*: what the pointer reports; headers included, scrolled
//!   tracks shifted by the viewport's scroll offset, frozen tracks fixed.

use super::tracks::{Axis, AxisStore};
use super::Viewport;
use crate::types::{CellRange, GridSettings, PixelRect};

/// Tracks of both axes plus the freeze boundary and merged regions.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    rows: AxisStore,
    cols: AxisStore,
    /// Number of frozen rows (0 = no frozen rows)
    frozen_rows: u32,
    /// Number of frozen columns (0 = no frozen columns)
    frozen_cols: u32,
    merges: Vec<CellRange>,
}

/// Result of mapping a view-space point, with `None` meaning the header strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHit {
    pub row: Option<u32>,
    pub col: Option<u32>,
}

impl SheetLayout {
    /// Create a layout from two axis stores.
    pub fn new(rows: AxisStore, cols: AxisStore) -> Self {
        Self {
            rows,
            cols,
            frozen_rows: 0,
            frozen_cols: 0,
            merges: Vec::new(),
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        let rows = AxisStore::new(
            settings.row.len,
            settings.row.height,
            settings.row.min_height,
            settings.row.header_height,
        );
        let cols = AxisStore::new(
            settings.col.len,
            settings.col.width,
            settings.col.min_width,
            settings.col.index_width,
        );
        let mut layout = Self::new(rows, cols);
        layout.set_freeze(settings.freeze.0, settings.freeze.1);
        layout
    }

    pub fn rows(&self) -> &AxisStore {
        &self.rows
    }

    pub fn cols(&self) -> &AxisStore {
        &self.cols
    }

    pub fn rows_mut(&mut self) -> &mut AxisStore {
        &mut self.rows
    }

    pub fn cols_mut(&mut self) -> &mut AxisStore {
        &mut self.cols
    }

    pub fn axis(&self, axis: Axis) -> &AxisStore {
        match axis {
            Axis::Row => &self.rows,
            Axis::Col => &self.cols,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisStore {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Col => &mut self.cols,
        }
    }

    /// Frozen `(rows, cols)`.
    pub fn frozen(&self) -> (u32, u32) {
        (self.frozen_rows, self.frozen_cols)
    }

    pub fn frozen_count(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.frozen_rows,
            Axis::Col => self.frozen_cols,
        }
    }

    /// Set the freeze boundary, clamped to the axis lengths.
    pub fn set_freeze(&mut self, rows: u32, cols: u32) {
        self.frozen_rows = rows.min(self.rows.len());
        self.frozen_cols = cols.min(self.cols.len());
    }

    /// Get the total height of frozen rows (returns 0 if no frozen rows)
    pub fn frozen_rows_height(&self) -> f32 {
        self.rows.offset(self.frozen_rows)
    }

    /// Get the total width of frozen columns (returns 0 if no frozen columns)
    pub fn frozen_cols_width(&self) -> f32 {
        self.cols.offset(self.frozen_cols)
    }

    /// Axis-space size of the frozen tracks on `axis`.
    pub fn frozen_extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Row => self.frozen_rows_height(),
            Axis::Col => self.frozen_cols_width(),
        }
    }

    /// Width of the row-header strip
    pub fn header_width(&self) -> f32 {
        self.cols.header_size()
    }

    /// Height of the column-header strip
    pub fn header_height(&self) -> f32 {
        self.rows.header_size()
    }

    /// Get total width of the sheet (headers excluded)
    pub fn total_width(&self) -> f32 {
        self.cols.total()
    }

    /// Get total height of the sheet (headers excluded)
    pub fn total_height(&self) -> f32 {
        self.rows.total()
    }

    /// Replace the merged regions reported by the cell store.
    pub fn set_merges(&mut self, merges: Vec<CellRange>) {
        self.merges = merges;
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    /// Merged region containing the cell, if any.
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&CellRange> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    /// Position of track `index` on `axis` in view space.
    pub fn view_position(&self, axis: Axis, index: u32, viewport: &Viewport) -> f32 {
        let store = self.axis(axis);
        let offset = store.offset(index);
        let shifted = if index < self.frozen_count(axis) {
            offset
        } else {
            offset - viewport.scroll(axis)
        };
        store.header_size() + shifted
    }

    /// Track under a view-space position, or `None` inside the header strip.
    pub fn view_index_at(&self, axis: Axis, pos: f32, viewport: &Viewport) -> Option<u32> {
        let store = self.axis(axis);
        let content = pos - store.header_size();
        if content < 0.0 {
            return None;
        }
        Some(store.index_at(self.view_to_sheet(axis, pos, viewport)))
    }

    /// Convert a view-space position to axis space. Header positions map to 0.
    pub fn view_to_sheet(&self, axis: Axis, pos: f32, viewport: &Viewport) -> f32 {
        let content = (pos - self.axis(axis).header_size()).max(0.0);
        if content < self.frozen_extent(axis) {
            content
        } else {
            content + viewport.scroll(axis)
        }
    }

    /// Map a view-space point to the cell under it, reporting header hits as `None`.
    pub fn hit_cell(&self, x: f32, y: f32, viewport: &Viewport) -> CellHit {
        let mut row = self.view_index_at(Axis::Row, y, viewport);
        let mut col = self.view_index_at(Axis::Col, x, viewport);
        if let (Some(r), Some(c)) = (row, col) {
            if let Some(merge) = self.merge_at(r, c) {
                row = Some(merge.start_row);
                col = Some(merge.start_col);
            }
        }
        CellHit { row, col }
    }

    /// Cell under a view-space point. Header positions clamp to index 0,
    /// positions past the last track clamp to the last index.
    pub fn cell_at(&self, x: f32, y: f32, viewport: &Viewport) -> (u32, u32) {
        let hit = self.hit_cell(x, y, viewport);
        (hit.row.unwrap_or(0), hit.col.unwrap_or(0))
    }

    /// Cell under a sheet-space point (no headers, no scroll).
    pub fn sheet_cell_at(&self, x: f32, y: f32) -> (u32, u32) {
        let row = self.rows.index_at(y);
        let col = self.cols.index_at(x);
        match self.merge_at(row, col) {
            Some(merge) => (merge.start_row, merge.start_col),
            None => (row, col),
        }
    }

    /// Sheet-space rectangle of a cell, spanning the whole merge for a merge origin.
    pub fn sheet_rect(&self, row: u32, col: u32) -> PixelRect {
        let range = self.span_of(row, col);
        let left = self.cols.offset(range.start_col);
        let top = self.rows.offset(range.start_row);
        PixelRect::new(
            left,
            top,
            self.cols.offset(range.end_col + 1) - left,
            self.rows.offset(range.end_row + 1) - top,
        )
    }

    /// View-space rectangle of a cell; the inverse of [`SheetLayout::cell_at`].
    pub fn rect_of(&self, row: u32, col: u32, viewport: &Viewport) -> PixelRect {
        self.range_rect(&self.span_of(row, col), viewport)
    }

    /// View-space rectangle covering a range.
    pub fn range_rect(&self, range: &CellRange, viewport: &Viewport) -> PixelRect {
        let left = self.view_position(Axis::Col, range.start_col, viewport);
        let top = self.view_position(Axis::Row, range.start_row, viewport);
        let width = self.cols.total_size(range.start_col, Some(range.end_col + 1));
        let height = self.rows.total_size(range.start_row, Some(range.end_row + 1));
        PixelRect::new(left, top, width, height)
    }

    /// The merge a cell originates, or the cell itself.
    fn span_of(&self, row: u32, col: u32) -> CellRange {
        match self.merge_at(row, col) {
            Some(merge) if merge.start_row == row && merge.start_col == col => *merge,
            _ => CellRange::single(row, col),
        }
    }

    /// Insert tracks before `at`, shifting the freeze boundary and merges below it.
    pub fn insert_tracks(&mut self, axis: Axis, at: u32, count: u32) {
        self.axis_mut(axis).insert(at, count);
        let shift = |v: &mut u32| {
            if *v >= at {
                *v += count;
            }
        };
        for merge in &mut self.merges {
            match axis {
                Axis::Row => {
                    shift(&mut merge.start_row);
                    shift(&mut merge.end_row);
                }
                Axis::Col => {
                    shift(&mut merge.start_col);
                    shift(&mut merge.end_col);
                }
            }
        }
        if self.frozen_count(axis) > at {
            match axis {
                Axis::Row => self.frozen_rows += count,
                Axis::Col => self.frozen_cols += count,
            }
        }
    }

    /// Delete tracks `at..at+count`, dropping merges that touch them.
    pub fn delete_tracks(&mut self, axis: Axis, at: u32, count: u32) {
        self.axis_mut(axis).delete(at, count);
        let end = at.saturating_add(count);
        self.merges.retain(|m| {
            let (s, e) = match axis {
                Axis::Row => (m.start_row, m.end_row),
                Axis::Col => (m.start_col, m.end_col),
            };
            e < at || s >= end
        });
        for merge in &mut self.merges {
            let (s, e) = match axis {
                Axis::Row => (&mut merge.start_row, &mut merge.end_row),
                Axis::Col => (&mut merge.start_col, &mut merge.end_col),
            };
            if *s >= end {
                *s -= count;
                *e -= count;
            }
        }
        let frozen = self.frozen_count(axis);
        let kept = if frozen <= at {
            frozen
        } else {
            at + frozen.saturating_sub(end)
        };
        match axis {
            Axis::Row => self.frozen_rows = kept.min(self.rows.len()),
            Axis::Col => self.frozen_cols = kept.min(self.cols.len()),
        }
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

    fn layout(rows: &[f32], cols: &[f32], header: f32) -> SheetLayout {
        SheetLayout::new(
            AxisStore::from_sizes(rows, 5.0, header),
            AxisStore::from_sizes(cols, 5.0, header),
        )
    }

    #[test]
    fn test_basic_layout() {
        let layout = layout(&[25.0; 3], &[100.0; 4], 0.0);
        assert_eq!(layout.total_width(), 400.0);
        assert_eq!(layout.total_height(), 75.0);
    }

    #[test]
    fn test_cell_at_without_headers() {
        let layout = layout(&[25.0; 3], &[100.0; 4], 0.0);
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(layout.cell_at(50.0, 30.0, &vp), (1, 0));
        assert_eq!(layout.rect_of(1, 0, &vp).top, 25.0);
        assert_eq!(layout.cell_at(5000.0, 5000.0, &vp), (2, 3));
    }

    #[test]
    fn test_header_hits_are_none() {
        let layout = layout(&[25.0; 3], &[100.0; 4], 20.0);
        let vp = Viewport::new(800.0, 600.0);
        let hit = layout.hit_cell(10.0, 50.0, &vp);
        assert_eq!(hit.col, None);
        assert_eq!(hit.row, Some(1));
        assert_eq!(layout.cell_at(10.0, 10.0, &vp), (0, 0));
    }

    #[test]
    fn test_merged_cells() {
        let mut layout = layout(&[25.0; 4], &[100.0; 4], 0.0);
        layout.set_merges(vec![CellRange::new(0, 0, 1, 1)]);
        let vp = Viewport::new(800.0, 600.0);

        let rect = layout.rect_of(0, 0, &vp);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 50.0);
        assert_eq!(layout.cell_at(150.0, 30.0, &vp), (0, 0));
        assert_eq!(layout.sheet_cell_at(150.0, 30.0), (0, 0));
    }

    #[test]
    fn test_view_to_sheet_respects_freeze() {
        let mut layout = layout(&[25.0; 40], &[100.0; 4], 20.0);
        layout.set_freeze(2, 0);
        let mut vp = Viewport::new(400.0, 300.0);
        vp.set_scroll(Axis::Row, 100.0, &layout);
        assert_eq!(layout.view_to_sheet(Axis::Row, 30.0, &vp), 10.0);
        assert_eq!(layout.view_to_sheet(Axis::Row, 80.0, &vp), 160.0);
        assert_eq!(layout.view_to_sheet(Axis::Row, 5.0, &vp), 0.0);
    }

    #[test]
    fn test_freeze_is_clamped() {
        let mut layout = layout(&[25.0; 3], &[100.0; 4], 0.0);
        layout.set_freeze(10, 2);
        assert_eq!(layout.frozen(), (3, 2));
        assert_eq!(layout.frozen_cols_width(), 200.0);
    }

    #[test]
    fn test_insert_and_delete_shift_merges_and_freeze() {
        let mut layout = layout(&[25.0; 6], &[100.0; 4], 0.0);
        layout.set_freeze(2, 0);
        layout.set_merges(vec![CellRange::new(3, 0, 4, 1)]);

        layout.insert_tracks(Axis::Row, 1, 2);
        assert_eq!(layout.rows().len(), 8);
        assert_eq!(layout.frozen(), (4, 0));
        assert_eq!(layout.merges()[0], CellRange::new(5, 0, 6, 1));

        layout.delete_tracks(Axis::Row, 0, 3);
        assert_eq!(layout.frozen(), (1, 0));
        assert_eq!(layout.merges()[0], CellRange::new(2, 0, 3, 1));

        layout.delete_tracks(Axis::Row, 2, 1);
        assert!(layout.merges().is_empty());
    }
}
