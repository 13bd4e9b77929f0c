//! Browser bindings.
//!
//! [`WasmGrid`] owns a [`GridView`] backed by an in-memory cell store and
//! forwards every observer notification to JavaScript callbacks. DOM events
//! are passed in as-is; offsets are read relative to the grid element.

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, MouseEvent, WheelEvent};

use crate::drawings::FloatingRecords;
use crate::layout::Axis;
use crate::resize::ResizeCommit;
use crate::store::{CellStore, GridObserver, MemoryCellStore};
use crate::types::{CellRange, FloatingObject, GridSettings, Mode, ObjectSpec, PixelRect};
use crate::viewer::{GestureToken, GridView, Key, Modifiers, PointerButton};

/// Notification payload handed to the JS `notify` callback.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum HostEvent<'a> {
    Attach { object: &'a FloatingObject },
    Detach { id: &'a str },
    Position { id: &'a str, rect: PixelRect },
    ResizeFinished { commit: &'a ResizeCommit },
    ObjectResizeFinished { object: &'a FloatingObject },
    MoveFinished { object: &'a FloatingObject },
    CellSelected { row: u32, col: u32 },
    RangeSelected { range: &'a CellRange },
    EditStarted { row: u32, col: u32, text: &'a str },
}

/// Observer that calls back into JavaScript.
pub struct JsObserver {
    render: Function,
    notify: Option<Function>,
}

impl JsObserver {
    fn send(&self, event: &HostEvent<'_>) {
        let Some(notify) = &self.notify else {
            return;
        };
        match serde_wasm_bindgen::to_value(event) {
            Ok(value) => {
                if notify.call1(&JsValue::NULL, &value).is_err() {
                    web_sys::console::warn_1(&"gridview: notify callback threw".into());
                }
            }
            Err(err) => tracing::warn!(%err, "could not serialize host event"),
        }
    }
}

impl GridObserver for JsObserver {
    fn render(&mut self) {
        if self.render.call0(&JsValue::NULL).is_err() {
            web_sys::console::warn_1(&"gridview: render callback threw".into());
        }
    }

    fn attach_object(&mut self, object: &FloatingObject) {
        self.send(&HostEvent::Attach { object });
    }

    fn detach_object(&mut self, id: &str) {
        self.send(&HostEvent::Detach { id });
    }

    fn position_object(&mut self, id: &str, rect: PixelRect) {
        self.send(&HostEvent::Position { id, rect });
    }

    fn resize_finished(&mut self, commit: &ResizeCommit) {
        self.send(&HostEvent::ResizeFinished { commit });
    }

    fn object_resize_finished(&mut self, object: &FloatingObject) {
        self.send(&HostEvent::ObjectResizeFinished { object });
    }

    fn move_finished(&mut self, object: &FloatingObject) {
        self.send(&HostEvent::MoveFinished { object });
    }

    fn cell_selected(&mut self, row: u32, col: u32) {
        self.send(&HostEvent::CellSelected { row, col });
    }

    fn range_selected(&mut self, range: &CellRange) {
        self.send(&HostEvent::RangeSelected { range });
    }

    fn edit_started(&mut self, row: u32, col: u32, text: &str) {
        self.send(&HostEvent::EditStarted { row, col, text });
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn modifiers(shift: bool, ctrl: bool, meta: bool, alt: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl: ctrl || meta,
        alt,
    }
}

fn axis_from_str(axis: &str) -> Axis {
    if axis.eq_ignore_ascii_case("col") || axis.eq_ignore_ascii_case("column") {
        Axis::Col
    } else {
        Axis::Row
    }
}

#[wasm_bindgen]
pub struct WasmGrid {
    view: GridView<MemoryCellStore, JsObserver>,
    token: Option<GestureToken>,
}

#[wasm_bindgen]
impl WasmGrid {
    /// Create a grid. `settings` is a plain settings object (or `undefined`
    /// for defaults); `render` is called after every visible change and
    /// `notify` receives `{ type, ... }` event objects.
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings: JsValue,
        render: Function,
        notify: Option<Function>,
    ) -> Result<WasmGrid, JsValue> {
        console_error_panic_hook::set_once();
        let settings: GridSettings = if settings.is_undefined() || settings.is_null() {
            GridSettings::default()
        } else {
            from_js(settings)?
        };
        let observer = JsObserver { render, notify };
        Ok(WasmGrid {
            view: GridView::new(settings, MemoryCellStore::new(), observer),
            token: None,
        })
    }

    #[wasm_bindgen(js_name = "onMouseDown")]
    pub fn on_mouse_down(&mut self, event: &MouseEvent) -> Result<(), JsValue> {
        // A press while we still hold a token means the release was lost.
        if self.token.take().is_some() {
            self.view.cancel_gesture();
        }
        let mods = modifiers(
            event.shift_key(),
            event.ctrl_key(),
            event.meta_key(),
            event.alt_key(),
        );
        let clicks = u32::try_from(event.detail()).unwrap_or(1);
        self.token = self.view.on_pointer_down(
            event.offset_x() as f32,
            event.offset_y() as f32,
            PointerButton::from_dom(event.button()),
            mods,
            clicks,
        )?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "onMouseMove")]
    pub fn on_mouse_move(&mut self, event: &MouseEvent) -> Result<bool, JsValue> {
        let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
        match self.token {
            Some(token) => Ok(self.view.on_pointer_move(token, x, y)?),
            None => Ok(false),
        }
    }

    /// Finish the active gesture. Pass `null` when the pointer was released
    /// outside the grid element.
    #[wasm_bindgen(js_name = "onMouseUp")]
    pub fn on_mouse_up(&mut self, event: Option<MouseEvent>) -> Result<(), JsValue> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        let at = event.map(|e| (e.offset_x() as f32, e.offset_y() as f32));
        self.view.on_pointer_up(token, at)?;
        Ok(())
    }

    /// Abort the active gesture (blur, lost pointer capture).
    #[wasm_bindgen(js_name = "cancelGesture")]
    pub fn cancel_gesture(&mut self) -> bool {
        self.token = None;
        self.view.cancel_gesture()
    }

    /// CSS cursor for a hover position.
    #[wasm_bindgen]
    pub fn cursor(&self, x: f32, y: f32) -> String {
        self.view.hover(x, y).css().to_string()
    }

    #[wasm_bindgen(js_name = "onWheel")]
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_wheel(&mut self, event: &WheelEvent) -> bool {
        self.view
            .on_wheel(event.delta_x() as f32, event.delta_y() as f32)
    }

    #[wasm_bindgen(js_name = "onTouchMove")]
    pub fn on_touch_move(&mut self, dx: f32, dy: f32) -> bool {
        self.view.on_touch_move(dx, dy)
    }

    #[wasm_bindgen(js_name = "onKeyDown")]
    pub fn on_key_down(&mut self, event: &KeyboardEvent) -> bool {
        let Some(key) = Key::from_dom(&event.key()) else {
            return false;
        };
        let mods = modifiers(
            event.shift_key(),
            event.ctrl_key(),
            event.meta_key(),
            event.alt_key(),
        );
        self.view.on_key_down(key, mods)
    }

    /// Drop a payload (object JSON or plain text) at a view position.
    #[wasm_bindgen(js_name = "onDrop")]
    pub fn on_drop(&mut self, x: f32, y: f32, payload: &str) -> bool {
        self.view.on_drop(x, y, payload)
    }

    #[wasm_bindgen]
    pub fn reset(&mut self, width: f32, height: f32) {
        self.view.reset(width, height);
    }

    #[wasm_bindgen(js_name = "setReadOnly")]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.view
            .set_mode(if read_only { Mode::Read } else { Mode::Edit });
    }

    #[wasm_bindgen]
    pub fn freeze(&mut self, rows: u32, cols: u32) {
        self.view.freeze(rows, cols);
    }

    #[wasm_bindgen]
    pub fn select(&mut self, row: u32, col: u32) {
        self.view.select(row, col);
    }

    #[wasm_bindgen(js_name = "setTrackSize")]
    pub fn set_track_size(&mut self, axis: &str, index: u32, size: f32) -> Option<f32> {
        self.view.set_track_size(axis_from_str(axis), index, size)
    }

    #[wasm_bindgen(js_name = "hideSelected")]
    pub fn hide_selected(&mut self) -> bool {
        self.view.hide_selected()
    }

    #[wasm_bindgen]
    pub fn unhide(&mut self, axis: &str, start: u32, end: u32) {
        self.view.unhide(axis_from_str(axis), start, end);
    }

    #[wasm_bindgen(js_name = "insertTracks")]
    pub fn insert_tracks(&mut self, axis: &str, at: u32, count: u32) {
        self.view.insert_tracks(axis_from_str(axis), at, count);
    }

    #[wasm_bindgen(js_name = "deleteTracks")]
    pub fn delete_tracks(&mut self, axis: &str, at: u32, count: u32) {
        self.view.delete_tracks(axis_from_str(axis), at, count);
    }

    /// Insert a floating object from an `ObjectSpec`-shaped value.
    #[wasm_bindgen(js_name = "insertObject")]
    pub fn insert_object(&mut self, spec: JsValue) -> Result<Option<String>, JsValue> {
        let spec: ObjectSpec = from_js(spec)?;
        Ok(self.view.insert_floating_object(spec))
    }

    #[wasm_bindgen(js_name = "deleteObject")]
    pub fn delete_object(&mut self, id: &str) -> Result<(), JsValue> {
        self.view.delete_floating_object(id)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "objectRecords")]
    pub fn object_records(&self) -> Result<JsValue, JsValue> {
        to_js(&self.view.floating_records())
    }

    #[wasm_bindgen(js_name = "loadObjectRecords")]
    pub fn load_object_records(&mut self, records: JsValue) -> Result<(), JsValue> {
        let records: FloatingRecords = from_js(records)?;
        self.view.load_floating_records(records);
        Ok(())
    }

    #[wasm_bindgen(js_name = "cellText")]
    pub fn cell_text(&self, row: u32, col: u32) -> Option<String> {
        self.view.store().cell_text(row, col)
    }

    #[wasm_bindgen(js_name = "editInput")]
    pub fn edit_input(&mut self, text: &str) {
        self.view.edit_input(text);
    }

    #[wasm_bindgen(js_name = "commitEdit")]
    pub fn commit_edit(&mut self) -> bool {
        self.view.commit_edit().is_some()
    }

    /// Cells changed by committed edits since the last call, as `[row, col]` pairs.
    #[wasm_bindgen(js_name = "takeDirtyCells")]
    pub fn take_dirty_cells(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.view.take_dirty_cells())
    }

    /// Current view state as a plain object.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.view.snapshot())
    }
}
