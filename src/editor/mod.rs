//! In-cell editing.
//!
//! The grid only tracks which cell is being edited and the pending text.
//! Committing writes the text through the [`CellStore`]; the visual input
//! element belongs to the host.

use crate::store::CellStore;

/// A pending edit of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub row: u32,
    pub col: u32,
    /// Text as currently typed.
    pub text: String,
    /// Cell text when editing started, restored on cancel.
    pub original: String,
}

/// Editor state (separate from the selection and layout).
#[derive(Debug, Default, Clone)]
pub struct EditorState {
    session: Option<EditSession>,
    /// Edited `(row, col)` cells since the last [`EditorState::take_dirty`].
    dirty: Vec<(u32, u32)>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Start editing `(row, col)`.
    ///
    /// With `initial`, the typed character replaces the cell's content;
    /// otherwise the existing text is kept for editing.
    pub fn begin(
        &mut self,
        row: u32,
        col: u32,
        existing: Option<String>,
        initial: Option<char>,
    ) -> &EditSession {
        let original = existing.unwrap_or_default();
        let text = match initial {
            Some(ch) => ch.to_string(),
            None => original.clone(),
        };
        self.session.insert(EditSession {
            row,
            col,
            text,
            original,
        })
    }

    /// Replace the pending text.
    pub fn input(&mut self, text: &str) {
        if let Some(session) = self.session.as_mut() {
            session.text.clear();
            session.text.push_str(text);
        }
    }

    /// Write the pending text to the store. Returns the edited cell.
    pub fn commit<S: CellStore + ?Sized>(&mut self, store: &mut S) -> Option<(u32, u32)> {
        let session = self.session.take()?;
        if session.text != session.original {
            store.set_cell_text(session.row, session.col, &session.text);
            self.dirty.push((session.row, session.col));
        }
        Some((session.row, session.col))
    }

    /// Drop the pending text.
    pub fn cancel(&mut self) -> Option<EditSession> {
        self.session.take()
    }

    /// Cells changed by commits, oldest first.
    pub fn take_dirty(&mut self) -> Vec<(u32, u32)> {
        std::mem::take(&mut self.dirty)
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
    use crate::store::MemoryCellStore;

    #[test]
    fn test_typed_char_replaces_content() {
        let mut store = MemoryCellStore::new();
        store.set_cell_text(0, 0, "old");
        let mut editor = EditorState::new();
        let session = editor.begin(0, 0, store.cell_text(0, 0), Some('7'));
        assert_eq!(session.text, "7");
        editor.commit(&mut store);
        assert_eq!(store.cell_text(0, 0).as_deref(), Some("7"));
        assert_eq!(editor.take_dirty(), vec![(0, 0)]);
    }

    #[test]
    fn test_unchanged_commit_is_clean() {
        let mut store = MemoryCellStore::new();
        store.set_cell_text(1, 2, "same");
        let mut editor = EditorState::new();
        editor.begin(1, 2, store.cell_text(1, 2), None);
        assert_eq!(editor.commit(&mut store), Some((1, 2)));
        assert!(editor.take_dirty().is_empty());
    }

    #[test]
    fn test_cancel_keeps_store() {
        let mut store = MemoryCellStore::new();
        let mut editor = EditorState::new();
        editor.begin(0, 0, None, Some('x'));
        editor.input("xyz");
        let session = editor.cancel().unwrap();
        assert_eq!(session.text, "xyz");
        assert!(store.is_empty());
        assert_eq!(editor.commit(&mut store), None);
    }
}
