//! Copy / cut marks and paste delegation.
//!
//! The grid never touches the system clipboard. Copy and cut only remember
//! which range is marked (so the renderer can draw the marching border);
//! paste hands source and target to the [`CellStore`].

use serde::Serialize;

use super::GridView;
use crate::store::{CellStore, GridObserver};
use crate::types::CellRange;

/// A range marked for copy or cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardMark {
    pub range: CellRange,
    pub cut: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    mark: Option<ClipboardMark>,
}

impl Clipboard {
    pub fn mark(&self) -> Option<ClipboardMark> {
        self.mark
    }

    pub fn copy(&mut self, range: CellRange) {
        self.mark = Some(ClipboardMark { range, cut: false });
    }

    pub fn cut(&mut self, range: CellRange) {
        self.mark = Some(ClipboardMark { range, cut: true });
    }

    /// Drop the mark. Returns whether there was one.
    pub fn clear(&mut self) -> bool {
        self.mark.take().is_some()
    }

    /// Mark to paste from. A cut mark is consumed, a copy mark stays.
    fn take_for_paste(&mut self) -> Option<ClipboardMark> {
        let mark = self.mark?;
        if mark.cut {
            self.mark = None;
        }
        Some(mark)
    }
}

impl<S: CellStore, O: GridObserver> GridView<S, O> {
    pub fn copy(&mut self) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.clipboard.copy(self.selector.range());
        self.render();
        true
    }

    pub fn cut(&mut self) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.clipboard.cut(self.selector.range());
        self.render();
        true
    }

    /// Paste the marked range at the selection. Returns the pasted range.
    pub fn paste(&mut self) -> Option<CellRange> {
        if self.is_read_only() {
            return None;
        }
        let mark = self.clipboard.take_for_paste()?;
        let target = self.selector.range();
        match self.store.paste(&mark.range, &target, mark.cut) {
            Ok(dest) => {
                self.selector
                    .set(dest.start_row, dest.start_col, &self.layout);
                self.selector
                    .set_end(dest.end_row, dest.end_col, false, &self.layout);
                self.selector.release();
                self.render();
                Some(dest)
            }
            Err(err) => {
                tracing::warn!(%err, "paste refused");
                if mark.cut {
                    self.clipboard.mark = Some(mark);
                }
                None
            }
        }
    }

    /// Clear the copy/cut mark (escape). Returns whether anything changed.
    pub fn clear_clipboard(&mut self) -> bool {
        if !self.clipboard.clear() {
            return false;
        }
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

    #[test]
    fn test_copy_mark_survives_paste() {
        let mut clip = Clipboard::default();
        clip.copy(CellRange::single(0, 0));
        assert!(clip.take_for_paste().is_some());
        assert!(clip.mark().is_some());
    }

    #[test]
    fn test_cut_mark_is_consumed() {
        let mut clip = Clipboard::default();
        clip.cut(CellRange::single(0, 0));
        assert!(clip.take_for_paste().unwrap().cut);
        assert!(clip.mark().is_none());
        assert!(!clip.clear());
    }
}
