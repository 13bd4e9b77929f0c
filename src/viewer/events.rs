//! Pointer, keyboard and drop handling for `GridView`.
//!
//! A pointer-down is resolved to exactly one [`HitTarget`]. Targets that
//! drag (selection, header selection, autofill corner, track borders,
//! object handles and bodies) install a gesture and return its token;
//! everything else completes immediately.

use super::gesture::Gesture;
use super::{GestureToken, GridView};
use crate::drawings::FloatingLayer;
use crate::error::Result;
use crate::layout::Axis;
use crate::resize::{Handle, ObjectMove, ObjectResize, TrackResize};
use crate::selection::Direction;
use crate::store::{CellStore, GridObserver};
use crate::types::{ObjectSpec, SelectionType};

/// Distance (pixels) from a header border that still grabs it.
const RESIZE_TOLERANCE: f32 = 4.0;
/// Half-size of an object resize handle.
const HANDLE_TOLERANCE: f32 = 5.0;
/// Half-size of the autofill square at the selection's bottom-right corner.
const AUTOFILL_TOLERANCE: f32 = 4.0;

/// Keyboard modifiers. `ctrl` also covers the command key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// From a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            _ => PointerButton::Primary,
        }
    }
}

/// Keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    F2,
    /// A printable character, space included
    Char(char),
}

impl Key {
    /// From a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Key> {
        let key = match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "F2" => Key::F2,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    fn direction(self, jump: bool) -> Option<Direction> {
        let dir = match (self, jump) {
            (Key::ArrowLeft, false) => Direction::Left,
            (Key::ArrowRight, false) => Direction::Right,
            (Key::ArrowUp, false) => Direction::Up,
            (Key::ArrowDown, false) => Direction::Down,
            (Key::ArrowLeft, true) => Direction::RowFirst,
            (Key::ArrowRight, true) => Direction::RowLast,
            (Key::ArrowUp, true) => Direction::ColFirst,
            (Key::ArrowDown, true) => Direction::ColLast,
            _ => return None,
        };
        Some(dir)
    }
}

/// What lies under a view-space point, in hit-test priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A resize handle of the active floating object
    ObjectHandle(String, Handle),
    /// The body of a floating object
    Object(String),
    /// Trailing border of a row, grabbed in the row header
    RowBorder(u32),
    /// Trailing border of a column, grabbed in the column header
    ColumnBorder(u32),
    /// The square at the selection's bottom-right corner
    AutofillCorner,
    /// Top-left header cell
    Corner,
    ColumnHeader(u32),
    RowHeader(u32),
    Cell(u32, u32),
}

/// Pointer cursor suggested for a hover position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    RowResize,
    ColResize,
    Move,
    Crosshair,
    Resize(Handle),
}

impl CursorHint {
    /// CSS `cursor` value.
    pub fn css(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::RowResize => "row-resize",
            CursorHint::ColResize => "col-resize",
            CursorHint::Move => "move",
            CursorHint::Crosshair => "crosshair",
            CursorHint::Resize(Handle::TopLeft | Handle::BottomRight) => "nwse-resize",
            CursorHint::Resize(Handle::TopRight | Handle::BottomLeft) => "nesw-resize",
            CursorHint::Resize(Handle::TopCenter | Handle::BottomCenter) => "ns-resize",
            CursorHint::Resize(Handle::MiddleLeft | Handle::MiddleRight) => "ew-resize",
        }
    }
}

impl<S: CellStore, O: GridObserver> GridView<S, O> {
    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    pub fn hit_test(&self, x: f32, y: f32) -> HitTarget {
        if let Some(active) = self.layer.active() {
            let rect = FloatingLayer::display_rect(active, &self.layout, &self.viewport);
            if let Some(handle) = Handle::hit(&rect, x, y, HANDLE_TOLERANCE) {
                return HitTarget::ObjectHandle(active.id.clone(), handle);
            }
        }
        if let Some(object) = self.layer.hit_test(x, y, &self.layout, &self.viewport) {
            return HitTarget::Object(object.id.clone());
        }

        let in_col_header = y < self.layout.header_height();
        let in_row_header = x < self.layout.header_width();
        match (in_row_header, in_col_header) {
            (true, true) => return HitTarget::Corner,
            (false, true) => {
                if let Some(col) = self.border_at(Axis::Col, x) {
                    return HitTarget::ColumnBorder(col);
                }
                let col = self.layout.view_index_at(Axis::Col, x, &self.viewport);
                return HitTarget::ColumnHeader(col.unwrap_or(0));
            }
            (true, false) => {
                if let Some(row) = self.border_at(Axis::Row, y) {
                    return HitTarget::RowBorder(row);
                }
                let row = self.layout.view_index_at(Axis::Row, y, &self.viewport);
                return HitTarget::RowHeader(row.unwrap_or(0));
            }
            (false, false) => {}
        }

        if self.autofill_corner_at(x, y) {
            return HitTarget::AutofillCorner;
        }
        let (row, col) = self.layout.cell_at(x, y, &self.viewport);
        HitTarget::Cell(row, col)
    }

    /// Track whose trailing border is within reach of `pos`. Read-only
    /// grids have no grabbable borders.
    fn border_at(&self, axis: Axis, pos: f32) -> Option<u32> {
        if self.is_read_only() {
            return None;
        }
        let index = self.layout.view_index_at(axis, pos, &self.viewport)?;
        let store = self.layout.axis(axis);
        let start = self.layout.view_position(axis, index, &self.viewport);
        let end = start + store.size(index);
        if (pos - end).abs() <= RESIZE_TOLERANCE {
            return Some(index);
        }
        if pos - start <= RESIZE_TOLERANCE && index > 0 {
            return store.prev_visible(index - 1);
        }
        None
    }

    fn autofill_corner_at(&self, x: f32, y: f32) -> bool {
        if self.is_read_only() || self.selector.kind() != SelectionType::CellRange {
            return false;
        }
        let rect = self
            .layout
            .range_rect(&self.selector.range(), &self.viewport);
        (x - rect.right()).abs() <= AUTOFILL_TOLERANCE
            && (y - rect.bottom()).abs() <= AUTOFILL_TOLERANCE
    }

    /// Cursor to show for a pointer hovering at `(x, y)`.
    pub fn hover(&self, x: f32, y: f32) -> CursorHint {
        match self.hit_test(x, y) {
            HitTarget::ObjectHandle(_, handle) if !self.is_read_only() => {
                CursorHint::Resize(handle)
            }
            HitTarget::Object(_) if !self.is_read_only() => CursorHint::Move,
            HitTarget::RowBorder(_) => CursorHint::RowResize,
            HitTarget::ColumnBorder(_) => CursorHint::ColResize,
            HitTarget::AutofillCorner => CursorHint::Crosshair,
            _ => CursorHint::Default,
        }
    }

    // ------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------

    /// Handle a press. Returns the token of the gesture it started, if any.
    ///
    /// # Errors
    /// Returns `GridError::GestureActive` while another gesture owns the
    /// pointer; nothing is changed in that case.
    pub fn on_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: PointerButton,
        mods: Modifiers,
        clicks: u32,
    ) -> Result<Option<GestureToken>> {
        self.gestures.ensure_idle()?;

        let hit = self.hit_test(x, y);
        tracing::debug!(?hit, x, y, ?button, "pointer down");

        if self.editor.is_editing() {
            self.editor.commit(&mut self.store);
        }
        if !matches!(hit, HitTarget::Object(_) | HitTarget::ObjectHandle(..)) {
            self.layer.set_active(None);
        }

        let read_only = self.is_read_only();
        let gesture = match hit {
            HitTarget::ObjectHandle(id, handle) => match self.layer.get(&id) {
                Some(object) if !read_only => Some(Gesture::ObjectResize(ObjectResize::begin(
                    id.as_str(),
                    handle,
                    object.rect(),
                    x,
                    y,
                ))),
                _ => None,
            },
            HitTarget::Object(id) => {
                self.layer.set_active(Some(&id));
                match self.layer.get(&id) {
                    Some(object) if !read_only => {
                        let start = (self.window_start(Axis::Col), self.window_start(Axis::Row));
                        let end = (self.window_edge(Axis::Col), self.window_edge(Axis::Row));
                        Some(Gesture::ObjectMove(ObjectMove::begin(
                            id.as_str(),
                            object.rect(),
                            x,
                            y,
                            start,
                            end,
                        )))
                    }
                    _ => None,
                }
            }
            HitTarget::RowBorder(row) => Some(Gesture::TrackResize(TrackResize::begin(
                Axis::Row,
                row,
                &self.layout,
                &self.viewport,
            ))),
            HitTarget::ColumnBorder(col) => Some(Gesture::TrackResize(TrackResize::begin(
                Axis::Col,
                col,
                &self.layout,
                &self.viewport,
            ))),
            HitTarget::AutofillCorner => Some(Gesture::Autofill),
            HitTarget::Corner => {
                self.selector.select_all(&self.layout);
                self.notify_selection();
                None
            }
            HitTarget::ColumnHeader(col) => {
                if mods.shift && self.selector.kind() == SelectionType::ColumnRange {
                    let (row, _) = self.selector.anchor();
                    self.selector.set_end(row, col, false, &self.layout);
                } else {
                    self.selector.select_column(col, &self.layout);
                }
                self.notify_selection();
                Some(Gesture::HeaderSelect(Axis::Col))
            }
            HitTarget::RowHeader(row) => {
                if mods.shift && self.selector.kind() == SelectionType::RowRange {
                    let (_, col) = self.selector.anchor();
                    self.selector.set_end(row, col, false, &self.layout);
                } else {
                    self.selector.select_row(row, &self.layout);
                }
                self.notify_selection();
                Some(Gesture::HeaderSelect(Axis::Row))
            }
            HitTarget::Cell(row, col) => self.press_cell(row, col, button, mods, clicks),
        };

        let gesture = gesture.filter(|_| button == PointerButton::Primary);
        let token = match gesture {
            Some(gesture) => Some(self.gestures.install(gesture, x, y)?),
            None => None,
        };
        self.render();
        Ok(token)
    }

    fn press_cell(
        &mut self,
        row: u32,
        col: u32,
        button: PointerButton,
        mods: Modifiers,
        clicks: u32,
    ) -> Option<Gesture> {
        if button == PointerButton::Secondary {
            // Context menus act on the existing selection when pressed inside it.
            if !self.selector.contains(row, col) {
                self.selector.set(row, col, &self.layout);
                self.selection_changed();
            }
            return None;
        }
        if mods.shift {
            self.selector.set_end(row, col, false, &self.layout);
            self.selector.release();
            self.selection_changed_at(row, col);
            return None;
        }
        self.selector.set(row, col, &self.layout);
        self.selection_changed();
        if clicks >= 2 {
            self.start_edit(None);
            return None;
        }
        Some(Gesture::Select)
    }

    /// Sheet-space leading edge of the visible window. Unscrolled, the
    /// frozen band is visible too and the window starts at the origin.
    fn window_start(&self, axis: Axis) -> f32 {
        let scroll = self.viewport.scroll(axis);
        if scroll > 0.0 {
            self.layout.frozen_extent(axis) + scroll
        } else {
            0.0
        }
    }

    /// Sheet-space far edge of the visible window on `axis`.
    fn window_edge(&self, axis: Axis) -> f32 {
        self.layout.frozen_extent(axis)
            + self.viewport.scroll(axis)
            + self.viewport.scrollable_size(axis, &self.layout)
    }

    /// Live update of the gesture owned by `token`. Returns whether anything
    /// visible changed (and a render was fired).
    ///
    /// # Errors
    /// Returns `GridError::StaleGesture` if `token` does not own the pointer.
    pub fn on_pointer_move(&mut self, token: GestureToken, x: f32, y: f32) -> Result<bool> {
        let mut active = self.gestures.take(token)?;
        active.last = (x, y);
        let changed = self.drive(&mut active.gesture, x, y, true);
        self.gestures.restore(active);
        if changed {
            self.render();
        }
        Ok(changed)
    }

    /// Finish the gesture owned by `token`. Without coordinates (release
    /// outside the surface) the last known pointer position is used.
    ///
    /// # Errors
    /// Returns `GridError::StaleGesture` if `token` does not own the pointer.
    pub fn on_pointer_up(&mut self, token: GestureToken, at: Option<(f32, f32)>) -> Result<()> {
        let mut active = self.gestures.take(token)?;
        let (x, y) = at.unwrap_or(active.last);
        self.drive(&mut active.gesture, x, y, false);
        self.finish(active.gesture);
        self.render();
        Ok(())
    }

    /// Abort whatever gesture is active (focus loss, pointer capture lost).
    /// Nothing is committed; previews are rolled back.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(active) = self.gestures.cancel() else {
            return false;
        };
        tracing::debug!(token = active.token.id(), "gesture cancelled");
        match active.gesture {
            Gesture::Select | Gesture::HeaderSelect(_) => self.selector.release(),
            Gesture::Autofill => {
                self.selector.take_autofill();
            }
            Gesture::TrackResize(_) => {}
            Gesture::ObjectResize(resize) => self.restore_object(resize.id()),
            Gesture::ObjectMove(movement) => self.restore_object(movement.id()),
        }
        self.render();
        true
    }

    fn restore_object(&mut self, id: &str) {
        if let Some(object) = self.layer.get(id) {
            let rect = FloatingLayer::display_rect(object, &self.layout, &self.viewport);
            self.observer.position_object(id, rect);
        }
    }

    fn drive(&mut self, gesture: &mut Gesture, x: f32, y: f32, live: bool) -> bool {
        match gesture {
            Gesture::Select => {
                let (row, col) = self.layout.cell_at(x, y, &self.viewport);
                let changed = self.selector.set_end(row, col, live, &self.layout);
                self.scroll_into_view(row, col) || changed
            }
            Gesture::HeaderSelect(axis) => {
                let (anchor_row, anchor_col) = self.selector.anchor();
                let (row, col) = match axis {
                    Axis::Row => {
                        let row = self.layout.view_index_at(Axis::Row, y, &self.viewport);
                        (row.unwrap_or(0), anchor_col)
                    }
                    Axis::Col => {
                        let col = self.layout.view_index_at(Axis::Col, x, &self.viewport);
                        (anchor_row, col.unwrap_or(0))
                    }
                };
                let changed = self.selector.set_end(row, col, live, &self.layout);
                self.scroll_into_view(row, col) || changed
            }
            Gesture::Autofill => {
                let (row, col) = self.layout.cell_at(x, y, &self.viewport);
                let before = self.selector.autofill_range();
                let after = self.selector.show_autofill(row, col, &self.layout);
                self.scroll_into_view(row, col) || before != after
            }
            Gesture::TrackResize(resize) => {
                let pos = match resize.axis() {
                    Axis::Row => y,
                    Axis::Col => x,
                };
                let before = resize.preview();
                resize.update(pos) != before
            }
            Gesture::ObjectResize(resize) => {
                let before = resize.preview();
                let rect = resize.update(x, y);
                if rect == before {
                    return false;
                }
                self.preview_object(resize.id(), &rect);
                true
            }
            Gesture::ObjectMove(movement) => {
                let before = movement.preview();
                let rect = movement.update(x, y);
                if rect == before {
                    return false;
                }
                self.preview_object(movement.id(), &rect);
                true
            }
        }
    }

    fn finish(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Select | Gesture::HeaderSelect(_) => {
                self.selector.release();
                self.notify_selection();
            }
            Gesture::Autofill => {
                let Some((source, target)) = self.selector.take_autofill() else {
                    return;
                };
                if self.is_read_only() {
                    return;
                }
                match self.store.autofill(&source, &target) {
                    Ok(()) => {
                        self.selector.union_with(target);
                        self.notify_selection();
                    }
                    Err(err) => tracing::warn!(%err, ?source, ?target, "autofill refused"),
                }
            }
            Gesture::TrackResize(resize) => {
                let range = self.selector.range();
                let commit = resize.commit(&mut self.layout, &range);
                self.layout_changed();
                self.observer.resize_finished(&commit);
            }
            Gesture::ObjectResize(resize) => {
                match self.layer.finalize(resize.id(), resize.preview(), &self.layout) {
                    Ok(object) => {
                        let object = object.clone();
                        self.restore_object(&object.id);
                        self.observer.object_resize_finished(&object);
                    }
                    Err(err) => tracing::warn!(%err, "object resize lost its target"),
                }
            }
            Gesture::ObjectMove(movement) => {
                match self
                    .layer
                    .finalize(movement.id(), movement.preview(), &self.layout)
                {
                    Ok(object) => {
                        let object = object.clone();
                        self.restore_object(&object.id);
                        self.observer.move_finished(&object);
                    }
                    Err(err) => tracing::warn!(%err, "object move lost its target"),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Handle a key press. Returns whether the grid consumed it.
    pub fn on_key_down(&mut self, key: Key, mods: Modifiers) -> bool {
        if self.editor.is_editing() {
            return self.editing_key(key, mods);
        }

        if let Some(direction) = key.direction(mods.ctrl) {
            self.selector
                .move_selection(direction, mods.shift, &self.layout);
            self.selection_changed();
            self.render();
            return true;
        }

        match key {
            Key::Tab | Key::Enter => {
                self.step_after(key, mods);
                self.render();
                true
            }
            Key::Escape => self.clear_clipboard(),
            Key::Backspace | Key::Delete => {
                if self.is_read_only() {
                    return false;
                }
                let range = self.selector.range();
                self.store.clear_text(&range);
                self.render();
                true
            }
            Key::F2 => self.begin_edit(None),
            Key::Char(ch) if mods.ctrl => match ch.to_ascii_lowercase() {
                'c' => self.copy(),
                'x' => self.cut(),
                'v' => self.paste().is_some(),
                ' ' => {
                    let (_, col) = self.selector.anchor();
                    self.selector.select_column(col, &self.layout);
                    self.notify_selection();
                    self.render();
                    true
                }
                _ => false,
            },
            Key::Char(' ') if mods.shift => {
                let (row, _) = self.selector.anchor();
                self.selector.select_row(row, &self.layout);
                self.notify_selection();
                self.render();
                true
            }
            Key::Char(ch) if !mods.alt && !ch.is_control() => self.begin_edit(Some(ch)),
            _ => false,
        }
    }

    fn editing_key(&mut self, key: Key, mods: Modifiers) -> bool {
        match key {
            Key::Enter | Key::Tab => {
                self.editor.commit(&mut self.store);
                self.step_after(key, mods);
                self.render();
                true
            }
            Key::Escape => self.cancel_edit(),
            _ => false,
        }
    }

    /// Tab moves right (shift: left), enter moves down (shift: up).
    fn step_after(&mut self, key: Key, mods: Modifiers) {
        let direction = match (key, mods.shift) {
            (Key::Tab, false) => Direction::Right,
            (Key::Tab, true) => Direction::Left,
            (_, false) => Direction::Down,
            (_, true) => Direction::Up,
        };
        self.selector.move_selection(direction, false, &self.layout);
        self.selection_changed();
    }

    // ------------------------------------------------------------------
    // Drop
    // ------------------------------------------------------------------

    /// Handle a drop at a view-space point.
    ///
    /// A JSON object description inserts a floating object there; any other
    /// payload is written as text into the cell under the point.
    pub fn on_drop(&mut self, x: f32, y: f32, payload: &str) -> bool {
        if self.is_read_only() || payload.is_empty() {
            return false;
        }
        match serde_json::from_str::<ObjectSpec>(payload) {
            Ok(spec) => {
                let spec = match (spec.left, spec.top) {
                    (Some(_), Some(_)) => spec,
                    _ => {
                        let left = self.layout.view_to_sheet(Axis::Col, x, &self.viewport);
                        let top = self.layout.view_to_sheet(Axis::Row, y, &self.viewport);
                        spec.at(left, top)
                    }
                };
                self.insert_floating_object(spec).is_some()
            }
            Err(err) => {
                tracing::debug!(%err, "drop payload is not an object, inserting text");
                let (row, col) = self.layout.cell_at(x, y, &self.viewport);
                self.store.set_cell_text(row, col, payload);
                self.selector.set(row, col, &self.layout);
                self.selection_changed();
                self.render();
                true
            }
        }
    }
}
