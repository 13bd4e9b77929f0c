use serde::{Deserialize, Serialize};

/// Type of selection for row/column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

impl SelectionType {
    /// True when the range spans every row (column or all selection).
    pub fn whole_rows(self) -> bool {
        matches!(self, Self::ColumnRange | Self::All)
    }

    /// True when the range spans every column (row or all selection).
    pub fn whole_cols(self) -> bool {
        matches!(self, Self::RowRange | Self::All)
    }
}

/// A rectangular range of cells, inclusive on both ends.
///
/// Always normalized: `start_row <= end_row` and `start_col <= end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    /// Create a range from two corners in any order.
    pub fn new(r1: u32, c1: u32, r2: u32, c2: u32) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.contains_row(row) && self.contains_col(col)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.start_row && row <= self.end_row
    }

    pub fn contains_col(&self, col: u32) -> bool {
        col >= self.start_col && col <= self.end_col
    }

    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    /// Get normalized bounds as `(start_row, start_col, end_row, end_col)`.
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.start_row, self.start_col, self.end_row, self.end_col)
    }

    /// True when the two ranges share at least one cell.
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let r = CellRange::new(5, 1, 2, 4);
        assert_eq!(r.bounds(), (2, 1, 5, 4));
        assert_eq!(r.row_count(), 4);
        assert_eq!(r.col_count(), 4);
        assert!(!r.is_single());
    }

    #[test]
    fn test_contains_and_intersects() {
        let r = CellRange::new(1, 1, 3, 3);
        assert!(r.contains(2, 2));
        assert!(!r.contains(0, 2));
        assert!(r.intersects(&CellRange::new(3, 3, 6, 6)));
        assert!(!r.intersects(&CellRange::single(4, 0)));
    }
}
