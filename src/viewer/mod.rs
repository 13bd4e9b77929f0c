//! The interactive grid surface.
//!
//! [`GridView`] ties the layout, viewport, selection, floating layer and
//! editor together and is the only thing hosts talk to. Every public method
//! that changes state finishes by firing exactly one
//! [`GridObserver::render`]; read-only mode turns data mutations into silent
//! no-ops while selection and scrolling keep working.

mod clipboard;
mod events;
mod gesture;
mod scroll;

pub use clipboard::{Clipboard, ClipboardMark};
pub use events::{CursorHint, HitTarget, Key, Modifiers, PointerButton};
pub use gesture::{Gesture, GestureToken};
pub use scroll::WheelAxis;

use serde::Serialize;

use crate::drawings::{self, FloatingLayer, FloatingRecords};
use crate::editor::EditorState;
use crate::error::Result;
use crate::layout::{Axis, SheetLayout, Viewport};
use crate::selection::Selector;
use crate::store::{CellStore, GridObserver};
use crate::types::{
    CellRange, FloatingObject, GridSettings, Mode, ObjectSpec, PixelRect, SelectionType,
};
use gesture::GestureSlot;

/// Serializable summary of the view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub selection: CellRange,
    pub kind: SelectionType,
    pub anchor: (u32, u32),
    pub multiple: bool,
    pub autofill: Option<CellRange>,
    /// `(x, y)` pixels scrolled past the frozen panes
    pub scroll: (f32, f32),
    /// `(row, col)` of the first scrolled track
    pub scroll_anchor: (u32, u32),
    pub frozen: (u32, u32),
    pub editing: Option<(u32, u32)>,
    pub clipboard: Option<ClipboardMark>,
    pub objects: Vec<FloatingObject>,
}

pub struct GridView<S: CellStore, O: GridObserver> {
    settings: GridSettings,
    layout: SheetLayout,
    viewport: Viewport,
    selector: Selector,
    layer: FloatingLayer,
    editor: EditorState,
    clipboard: Clipboard,
    gestures: GestureSlot,
    wheel_axis: WheelAxis,
    store: S,
    observer: O,
}

impl<S: CellStore, O: GridObserver> GridView<S, O> {
    pub fn new(settings: GridSettings, store: S, observer: O) -> Self {
        let mut layout = SheetLayout::from_settings(&settings);
        layout.set_merges(store.merges());
        let viewport = Viewport::new(settings.view.width, settings.view.height);
        let mut selector = Selector::new();
        selector.set(0, 0, &layout);
        Self {
            settings,
            layout,
            viewport,
            selector,
            layer: FloatingLayer::new(),
            editor: EditorState::new(),
            clipboard: Clipboard::default(),
            gestures: GestureSlot::default(),
            wheel_axis: WheelAxis::default(),
            store,
            observer,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn selection(&self) -> CellRange {
        self.selector.range()
    }

    pub fn layer(&self) -> &FloatingLayer {
        &self.layer
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn is_read_only(&self) -> bool {
        self.settings.is_read_only()
    }

    /// The gesture currently owning the pointer, if any.
    pub fn active_gesture(&self) -> Option<&Gesture> {
        self.gestures.gesture()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            selection: self.selector.range(),
            kind: self.selector.kind(),
            anchor: self.selector.anchor(),
            multiple: self.selector.is_multiple(),
            autofill: self.selector.autofill_range(),
            scroll: (self.viewport.scroll_x(), self.viewport.scroll_y()),
            scroll_anchor: self.viewport.anchor(),
            frozen: self.layout.frozen(),
            editing: self.editor.session().map(|s| (s.row, s.col)),
            clipboard: self.clipboard.mark(),
            objects: self.layer.iter().cloned().collect(),
        }
    }

    // ------------------------------------------------------------------
    // Host API
    // ------------------------------------------------------------------

    pub fn set_mode(&mut self, mode: Mode) {
        if self.settings.mode == mode {
            return;
        }
        self.settings.mode = mode;
        if mode == Mode::Read {
            self.editor.cancel();
            self.clipboard.clear();
        }
        self.render();
    }

    /// Recompute viewport and selection after the host element was resized
    /// or the store changed underneath.
    pub fn reset(&mut self, width: f32, height: f32) {
        self.layout.set_merges(self.store.merges());
        self.viewport.resize(width, height, &self.layout);
        self.selector.clamp_to(&self.layout);
        self.layer.rebind_all(&self.layout);
        self.reposition_objects();
        self.render();
    }

    pub fn freeze(&mut self, rows: u32, cols: u32) {
        self.layout.set_freeze(rows, cols);
        self.viewport.clamp_scroll(&self.layout);
        self.reposition_objects();
        self.render();
    }

    /// Select one cell and keep it visible.
    pub fn select(&mut self, row: u32, col: u32) {
        self.selector.set(row, col, &self.layout);
        self.selection_changed();
        self.render();
    }

    /// Select a range, anchored at its top-left corner.
    pub fn select_range(&mut self, range: CellRange) {
        self.selector
            .set(range.start_row, range.start_col, &self.layout);
        self.selector
            .set_end(range.end_row, range.end_col, false, &self.layout);
        self.selector.release();
        self.selection_changed();
        self.render();
    }

    /// Set a track's size directly. Returns the applied (clamped) size.
    pub fn set_track_size(&mut self, axis: Axis, index: u32, size: f32) -> Option<f32> {
        if self.is_read_only() {
            return None;
        }
        let applied = self.layout.axis_mut(axis).set_size(index, size);
        self.layout_changed();
        self.render();
        Some(applied)
    }

    /// Hide or show tracks `start..=end`.
    pub fn set_tracks_hidden(&mut self, axis: Axis, start: u32, end: u32, hidden: bool) {
        if self.is_read_only() {
            return;
        }
        let store = self.layout.axis_mut(axis);
        for index in start..=end.min(store.last_index()) {
            store.set_hidden(index, hidden);
        }
        self.layout_changed();
        self.render();
    }

    /// Hide the selected rows or columns. Only whole-row or whole-column
    /// selections hide anything.
    pub fn hide_selected(&mut self) -> bool {
        let range = self.selector.range();
        match self.selector.kind() {
            SelectionType::RowRange => {
                self.set_tracks_hidden(Axis::Row, range.start_row, range.end_row, true);
            }
            SelectionType::ColumnRange => {
                self.set_tracks_hidden(Axis::Col, range.start_col, range.end_col, true);
            }
            _ => return false,
        }
        !self.is_read_only()
    }

    /// Show every hidden track in `start..=end`.
    pub fn unhide(&mut self, axis: Axis, start: u32, end: u32) {
        self.set_tracks_hidden(axis, start, end, false);
    }

    pub fn insert_tracks(&mut self, axis: Axis, at: u32, count: u32) {
        if self.is_read_only() || count == 0 {
            return;
        }
        self.layout.insert_tracks(axis, at, count);
        self.layout_changed();
        self.render();
    }

    pub fn delete_tracks(&mut self, axis: Axis, at: u32, count: u32) {
        if self.is_read_only() || count == 0 {
            return;
        }
        // An axis never drops below one track.
        let len = self.layout.axis(axis).len();
        let count = count.min(len.saturating_sub(at)).min(len.saturating_sub(1));
        if count == 0 {
            return;
        }
        self.layout.delete_tracks(axis, at, count);
        self.layout_changed();
        self.render();
    }

    /// Place a new floating object. Without an explicit position it goes to
    /// the top-left corner of the active cell. Returns the new id.
    pub fn insert_floating_object(&mut self, spec: ObjectSpec) -> Option<String> {
        if self.is_read_only() {
            return None;
        }
        let (row, col) = self.selector.anchor();
        let cell = self.layout.sheet_rect(row, col);
        let rect = PixelRect::new(
            spec.left.unwrap_or(cell.left),
            spec.top.unwrap_or(cell.top),
            spec.width,
            spec.height,
        );
        let id = self.layer.insert(spec.content, rect, &self.layout);
        self.attach(&id);
        self.render();
        Some(id)
    }

    /// Remove a floating object.
    ///
    /// # Errors
    /// Returns `GridError::UnknownObject` for an unknown id.
    pub fn delete_floating_object(&mut self, id: &str) -> Result<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.layer.remove(id)?;
        self.observer.detach_object(id);
        self.render();
        Ok(())
    }

    /// Move/resize a floating object to a sheet-space rectangle and rebind it.
    ///
    /// # Errors
    /// Returns `GridError::UnknownObject` for an unknown id.
    pub fn move_floating_object(&mut self, id: &str, rect: PixelRect) -> Result<()> {
        if self.is_read_only() {
            return Ok(());
        }
        self.layer.finalize(id, rect, &self.layout)?;
        self.observer.detach_object(id);
        self.attach(id);
        self.render();
        Ok(())
    }

    /// Activate (or with `None` deactivate) an object's resize handles.
    pub fn activate_object(&mut self, id: Option<&str>) {
        self.layer.set_active(id);
        self.render();
    }

    pub fn floating_records(&self) -> FloatingRecords {
        self.layer.records()
    }

    /// Replace all floating objects with persisted records.
    pub fn load_floating_records(&mut self, records: FloatingRecords) {
        let old: Vec<String> = self.layer.iter().map(|o| o.id.clone()).collect();
        for id in &old {
            self.observer.detach_object(id);
        }
        self.layer.load(records);
        let ids: Vec<String> = self.layer.iter().map(|o| o.id.clone()).collect();
        for id in &ids {
            self.attach(id);
        }
        self.render();
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Start editing the active cell. `initial` replaces its content.
    pub fn begin_edit(&mut self, initial: Option<char>) -> bool {
        if !self.start_edit(initial) {
            return false;
        }
        self.render();
        true
    }

    /// Replace the pending edit text.
    pub fn edit_input(&mut self, text: &str) {
        if self.editor.is_editing() {
            self.editor.input(text);
        }
    }

    pub fn commit_edit(&mut self) -> Option<(u32, u32)> {
        let cell = self.editor.commit(&mut self.store)?;
        self.render();
        Some(cell)
    }

    /// Cells whose text changed through committed edits since the last
    /// call, oldest first.
    pub fn take_dirty_cells(&mut self) -> Vec<(u32, u32)> {
        self.editor.take_dirty()
    }

    pub fn cancel_edit(&mut self) -> bool {
        if self.editor.cancel().is_none() {
            return false;
        }
        self.render();
        true
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn render(&mut self) {
        self.observer.render();
    }

    fn attach(&mut self, id: &str) {
        let Some(object) = self.layer.get(id) else {
            return;
        };
        let rect = FloatingLayer::display_rect(object, &self.layout, &self.viewport);
        self.observer.attach_object(object);
        self.observer.position_object(id, rect);
    }

    fn reposition_objects(&mut self) {
        for (id, rect) in self.layer.reposition(&self.layout, &self.viewport) {
            self.observer.position_object(&id, rect);
        }
    }

    /// Show a live preview rectangle (sheet space) for an object.
    fn preview_object(&mut self, id: &str, rect: &PixelRect) {
        let view = drawings::to_view(rect, &self.layout, &self.viewport);
        self.observer.position_object(id, view);
    }

    /// Follow-up after tracks changed size, visibility or count.
    fn layout_changed(&mut self) {
        self.viewport.clamp_scroll(&self.layout);
        self.selector.clamp_to(&self.layout);
        self.layer.rebind_all(&self.layout);
        self.reposition_objects();
    }

    fn start_edit(&mut self, initial: Option<char>) -> bool {
        if self.is_read_only() {
            return false;
        }
        let (row, col) = self.selector.anchor();
        let existing = self.store.cell_text(row, col);
        let text = self.editor.begin(row, col, existing, initial).text.clone();
        tracing::debug!(row, col, "edit started");
        self.observer.edit_started(row, col, &text);
        true
    }

    /// Keep the focus cell visible and tell the host what is selected.
    fn selection_changed(&mut self) {
        let (row, col) = self.selector.moving_anchor();
        self.selection_changed_at(row, col);
    }

    fn selection_changed_at(&mut self, row: u32, col: u32) {
        self.scroll_into_view(row, col);
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        if self.selector.is_multiple() {
            let range = self.selector.range();
            self.observer.range_selected(&range);
        } else {
            let (row, col) = self.selector.anchor();
            self.observer.cell_selected(row, col);
        }
    }

    /// Scroll the minimum needed for `(row, col)` to be visible.
    fn scroll_into_view(&mut self, row: u32, col: u32) -> bool {
        let kind = self.selector.kind();
        let target = CellRange::single(row, col);
        let moved = self.viewport.ensure_visible(&target, kind, &self.layout);
        if moved {
            self.reposition_objects();
        }
        moved
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
    use crate::store::{MemoryCellStore, NullObserver};

    fn view() -> GridView<MemoryCellStore, NullObserver> {
        GridView::new(GridSettings::default(), MemoryCellStore::new(), NullObserver)
    }

    #[test]
    fn test_new_selects_origin() {
        let view = view();
        assert_eq!(view.selection(), CellRange::single(0, 0));
        assert_eq!(view.layout().rows().len(), 100);
        assert_eq!(view.viewport().width, 1024.0);
    }

    #[test]
    fn test_select_far_cell_scrolls() {
        let mut view = view();
        view.select(80, 0);
        assert!(view.viewport().scroll_y() > 0.0);
        let rect = view.layout().rect_of(80, 0, view.viewport());
        assert!(rect.bottom() <= view.viewport().height);
    }

    #[test]
    fn test_insert_object_at_active_cell() {
        let mut view = view();
        view.select(2, 1);
        let id = view
            .insert_floating_object(ObjectSpec::image("a.png", 50.0, 50.0))
            .unwrap();
        let obj = view.layer().get(&id).unwrap();
        assert_eq!((obj.left, obj.top), (100.0, 50.0));
        assert_eq!(obj.bound_range.sc.ri, 2);
    }

    #[test]
    fn test_read_only_blocks_mutations() {
        let mut view = view();
        view.set_mode(Mode::Read);
        assert!(view
            .insert_floating_object(ObjectSpec::image("a.png", 50.0, 50.0))
            .is_none());
        assert_eq!(view.set_track_size(Axis::Row, 0, 80.0), None);
        view.delete_tracks(Axis::Row, 0, 5);
        assert_eq!(view.layout().rows().len(), 100);
        assert!(!view.begin_edit(None));
        view.select(3, 3);
        assert_eq!(view.selection(), CellRange::single(3, 3));
    }

    #[test]
    fn test_delete_tracks_keeps_one() {
        let mut view = view();
        view.delete_tracks(Axis::Col, 0, 1000);
        assert_eq!(view.layout().cols().len(), 1);
    }
}
