//! Collaborator interfaces the grid drives but does not own.
//!
//! Cell values live behind [`CellStore`]; drawing lives behind
//! [`GridObserver`]. Both are called synchronously from inside a mutation,
//! so the observer sees the post-mutation state and nothing in between.

use std::collections::HashMap;

use crate::error::{GridError, Result};
use crate::resize::ResizeCommit;
use crate::types::{CellRange, FloatingObject, PixelRect};

/// Cell contents and the operations that rewrite them.
pub trait CellStore {
    fn cell_text(&self, row: u32, col: u32) -> Option<String>;

    fn set_cell_text(&mut self, row: u32, col: u32, text: &str);

    fn clear_text(&mut self, range: &CellRange);

    /// Extend the contents of `source` into the adjacent `target`.
    ///
    /// # Errors
    /// Returns `GridError::Refused` when the store cannot fill the target.
    fn autofill(&mut self, source: &CellRange, target: &CellRange) -> Result<()>;

    /// Copy (or move, with `cut`) `source` to the block starting at the
    /// top-left of `target`. Returns the range that received content.
    ///
    /// # Errors
    /// Returns `GridError::Refused` when the paste cannot be applied.
    fn paste(&mut self, source: &CellRange, target: &CellRange, cut: bool) -> Result<CellRange>;

    /// Merged regions, consulted whenever the layout is rebuilt.
    fn merges(&self) -> Vec<CellRange> {
        Vec::new()
    }
}

/// Receives redraw requests and host notifications.
///
/// `render` is fired exactly once after every structural mutation.
#[allow(unused_variables)]
pub trait GridObserver {
    fn render(&mut self);

    fn attach_object(&mut self, object: &FloatingObject) {}

    fn detach_object(&mut self, id: &str) {}

    /// New view-space rectangle of an object, after scroll or a live drag.
    fn position_object(&mut self, id: &str, rect: PixelRect) {}

    fn resize_finished(&mut self, commit: &ResizeCommit) {}

    fn object_resize_finished(&mut self, object: &FloatingObject) {}

    fn move_finished(&mut self, object: &FloatingObject) {}

    fn cell_selected(&mut self, row: u32, col: u32) {}

    fn range_selected(&mut self, range: &CellRange) {}

    fn edit_started(&mut self, row: u32, col: u32, text: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GridObserver for NullObserver {
    fn render(&mut self) {}
}

/// Plain-text cells in a hash map.
#[derive(Debug, Default, Clone)]
pub struct MemoryCellStore {
    cells: HashMap<(u32, u32), String>,
    merges: Vec<CellRange>,
}

impl MemoryCellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_merges(mut self, merges: Vec<CellRange>) -> Self {
        self.merges = merges;
        self
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn block(&self, source: &CellRange) -> Vec<(u32, u32, String)> {
        self.cells
            .iter()
            .filter(|((r, c), _)| source.contains(*r, *c))
            .map(|((r, c), text)| (r - source.start_row, c - source.start_col, text.clone()))
            .collect()
    }
}

impl CellStore for MemoryCellStore {
    fn cell_text(&self, row: u32, col: u32) -> Option<String> {
        self.cells.get(&(row, col)).cloned()
    }

    fn set_cell_text(&mut self, row: u32, col: u32, text: &str) {
        if text.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), text.to_string());
        }
    }

    fn clear_text(&mut self, range: &CellRange) {
        self.cells.retain(|(r, c), _| !range.contains(*r, *c));
    }

    fn autofill(&mut self, source: &CellRange, target: &CellRange) -> Result<()> {
        if self.merges.iter().any(|m| m.intersects(target)) {
            return Err(GridError::Refused("autofill over merged cells".into()));
        }
        let rows = source.row_count();
        let cols = source.col_count();
        for r in target.start_row..=target.end_row {
            for c in target.start_col..=target.end_col {
                let from_r = source.start_row + r.abs_diff(source.start_row) % rows;
                let from_c = source.start_col + c.abs_diff(source.start_col) % cols;
                match self.cell_text(from_r, from_c) {
                    Some(text) => self.cells.insert((r, c), text),
                    None => self.cells.remove(&(r, c)),
                };
            }
        }
        Ok(())
    }

    fn paste(&mut self, source: &CellRange, target: &CellRange, cut: bool) -> Result<CellRange> {
        let dest = CellRange::new(
            target.start_row,
            target.start_col,
            target.start_row + source.row_count() - 1,
            target.start_col + source.col_count() - 1,
        );
        if self.merges.iter().any(|m| m.intersects(&dest)) {
            return Err(GridError::Refused("paste over merged cells".into()));
        }
        let block = self.block(source);
        if cut {
            self.clear_text(source);
        }
        self.clear_text(&dest);
        for (r, c, text) in block {
            self.cells.insert((dest.start_row + r, dest.start_col + c), text);
        }
        Ok(dest)
    }

    fn merges(&self) -> Vec<CellRange> {
        self.merges.clone()
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

    #[test]
    fn test_autofill_repeats_pattern() {
        let mut store = MemoryCellStore::new();
        store.set_cell_text(0, 0, "a");
        store.set_cell_text(1, 0, "b");
        store
            .autofill(&CellRange::new(0, 0, 1, 0), &CellRange::new(2, 0, 4, 0))
            .unwrap();
        assert_eq!(store.cell_text(2, 0).as_deref(), Some("a"));
        assert_eq!(store.cell_text(3, 0).as_deref(), Some("b"));
        assert_eq!(store.cell_text(4, 0).as_deref(), Some("a"));
    }

    #[test]
    fn test_autofill_refuses_merges() {
        let mut store = MemoryCellStore::new().with_merges(vec![CellRange::new(3, 0, 3, 1)]);
        let err = store.autofill(&CellRange::single(0, 0), &CellRange::new(1, 0, 4, 0));
        assert!(matches!(err, Err(GridError::Refused(_))));
    }

    #[test]
    fn test_cut_paste_moves_block() {
        let mut store = MemoryCellStore::new();
        store.set_cell_text(0, 0, "x");
        store.set_cell_text(0, 1, "y");
        let dest = store
            .paste(&CellRange::new(0, 0, 0, 1), &CellRange::single(5, 5), true)
            .unwrap();
        assert_eq!(dest, CellRange::new(5, 5, 5, 6));
        assert_eq!(store.cell_text(5, 6).as_deref(), Some("y"));
        assert!(store.cell_text(0, 0).is_none());
    }

    #[test]
    fn test_empty_text_removes_cell() {
        let mut store = MemoryCellStore::new();
        store.set_cell_text(1, 1, "v");
        store.set_cell_text(1, 1, "");
        assert!(store.is_empty());
    }
}
