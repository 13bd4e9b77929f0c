//! Input dispatcher tests
//!
//! Gesture ownership, render accounting, keyboard editing, clipboard marks,
//! drops and read-only behaviour.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::*;
use gridview::error::GridError;
use gridview::layout::Axis;
use gridview::viewer::{Gesture, Key, Modifiers, PointerButton};
use gridview::{CellRange, CellStore};

#[test]
fn test_second_press_is_rejected() {
    let mut grid = grid();
    let (x, y) = cell_center(1, 1);
    let token = press(&mut grid, x, y).unwrap();
    let (x2, y2) = cell_center(5, 5);
    let err = grid
        .on_pointer_down(x2, y2, PointerButton::Primary, Modifiers::NONE, 1)
        .unwrap_err();
    assert!(matches!(err, GridError::GestureActive(id) if id == token.id()));
    assert_selection(&grid, 1, 1, 1, 1);
    assert_eq!(grid.observer().renders, 1);
}

#[test]
fn test_stale_token_is_rejected() {
    let mut grid = grid();
    let (x, y) = cell_center(0, 0);
    let first = press(&mut grid, x, y).unwrap();
    grid.on_pointer_up(first, None).unwrap();
    let second = press(&mut grid, x, y).unwrap();
    assert_ne!(first, second);

    assert!(matches!(
        grid.on_pointer_move(first, x, y + 100.0),
        Err(GridError::StaleGesture(_))
    ));
    assert!(matches!(
        grid.on_pointer_up(first, None),
        Err(GridError::StaleGesture(_))
    ));
    // The rightful owner is untouched.
    assert_eq!(grid.active_gesture(), Some(&Gesture::Select));
    grid.on_pointer_up(second, None).unwrap();
    assert!(grid.active_gesture().is_none());
}

#[test]
fn test_one_render_per_press_and_release() {
    let mut grid = grid();
    let (x, y) = cell_center(2, 2);
    let token = press(&mut grid, x, y).unwrap();
    assert_eq!(grid.observer().renders, 1);
    grid.on_pointer_up(token, None).unwrap();
    assert_eq!(grid.observer().renders, 2);

    // Presses that complete immediately still render once.
    assert!(press(&mut grid, 10.0, 10.0).is_none());
    assert_eq!(grid.observer().renders, 3);
    assert_selection(&grid, 0, 0, 99, 25);
}

#[test]
fn test_move_renders_only_on_change() {
    let mut grid = grid();
    let (x, y) = cell_center(0, 0);
    let token = press(&mut grid, x, y).unwrap();
    assert!(!grid.on_pointer_move(token, x + 5.0, y + 3.0).unwrap());
    assert_eq!(grid.observer().renders, 1);

    let (x2, y2) = cell_center(2, 1);
    assert!(grid.on_pointer_move(token, x2, y2).unwrap());
    assert_eq!(grid.observer().renders, 2);
    // Same cell again: nothing new to draw.
    assert!(!grid.on_pointer_move(token, x2 + 1.0, y2).unwrap());
    assert_eq!(grid.observer().renders, 2);
    grid.on_pointer_up(token, None).unwrap();
}

#[test]
fn test_release_outside_uses_last_position() {
    let mut grid = grid();
    let (x, y) = cell_center(0, 0);
    let token = press(&mut grid, x, y).unwrap();
    let (x2, y2) = cell_center(3, 2);
    grid.on_pointer_move(token, x2, y2).unwrap();
    grid.on_pointer_up(token, None).unwrap();
    assert_selection(&grid, 0, 0, 3, 2);
    assert!(grid.observer().events.contains(&Recorded::RangeSelected(
        CellRange::new(0, 0, 3, 2)
    )));
}

#[test]
fn test_cancel_track_resize_commits_nothing() {
    let mut grid = grid();
    let border_x = HEADER_WIDTH + COL_WIDTH;
    let token = press(&mut grid, border_x, 10.0).unwrap();
    grid.on_pointer_move(token, border_x + 80.0, 10.0).unwrap();
    assert!(grid.cancel_gesture());
    assert!(!grid.cancel_gesture());

    assert_eq!(grid.layout().cols().size(0), COL_WIDTH);
    assert_eq!(
        grid.observer()
            .count(|e| matches!(e, Recorded::ResizeFinished(_))),
        0
    );
    // The pointer is free again.
    assert!(press(&mut grid, border_x, 10.0).is_some());
}

#[test]
fn test_cancel_autofill_drops_preview() {
    let mut grid = GridBuilder::new().cell(0, 0, "a").build();
    let corner = (HEADER_WIDTH + COL_WIDTH, HEADER_HEIGHT + ROW_HEIGHT);
    let token = press(&mut grid, corner.0, corner.1).unwrap();
    assert_eq!(grid.active_gesture(), Some(&Gesture::Autofill));
    let (x, y) = cell_center(3, 0);
    grid.on_pointer_move(token, x, y).unwrap();
    assert!(grid.selector().autofill_range().is_some());

    grid.cancel_gesture();
    assert!(grid.selector().autofill_range().is_none());
    assert_eq!(grid.store().cell_text(3, 0), None);
    assert_selection(&grid, 0, 0, 0, 0);
}

#[test]
fn test_secondary_button_never_drags() {
    let mut grid = grid();
    let (x, y) = cell_center(4, 4);
    let token = grid
        .on_pointer_down(x, y, PointerButton::Secondary, Modifiers::NONE, 1)
        .unwrap();
    assert!(token.is_none());
    assert!(grid.active_gesture().is_none());
    assert_selection(&grid, 4, 4, 4, 4);
}

#[test]
fn test_typing_starts_edit_and_enter_commits() {
    let mut grid = grid();
    grid.select(2, 3);
    grid.observer_mut().clear();

    assert!(grid.on_key_down(Key::Char('7'), Modifiers::NONE));
    assert_eq!(
        grid.observer().events,
        vec![Recorded::EditStarted(2, 3, "7".into())]
    );
    assert_eq!(grid.snapshot().editing, Some((2, 3)));

    grid.edit_input("42");
    assert!(grid.on_key_down(Key::Enter, Modifiers::NONE));
    assert_eq!(grid.store().cell_text(2, 3).as_deref(), Some("42"));
    assert_selection(&grid, 3, 3, 3, 3);
    assert!(!grid.editor().is_editing());
}

#[test]
fn test_tab_while_editing_moves_right() {
    let mut grid = grid();
    grid.on_key_down(Key::Char('x'), Modifiers::NONE);
    grid.on_key_down(Key::Tab, Modifiers::NONE);
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("x"));
    assert_selection(&grid, 0, 1, 0, 1);
}

#[test]
fn test_escape_cancels_edit() {
    let mut grid = GridBuilder::new().cell(0, 0, "keep").build();
    grid.on_key_down(Key::Char('z'), Modifiers::NONE);
    grid.edit_input("zzz");
    assert!(grid.on_key_down(Key::Escape, Modifiers::NONE));
    assert!(!grid.editor().is_editing());
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("keep"));
}

#[test]
fn test_f2_keeps_existing_text() {
    let mut grid = GridBuilder::new().cell(0, 0, "old").build();
    assert!(grid.on_key_down(Key::F2, Modifiers::NONE));
    assert_eq!(
        grid.observer().events.last(),
        Some(&Recorded::EditStarted(0, 0, "old".into()))
    );
    assert_eq!(grid.commit_edit(), Some((0, 0)));
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("old"));
}

#[test]
fn test_committed_edits_are_drained_as_dirty_cells() {
    let mut grid = GridBuilder::new().cell(1, 0, "same").build();
    grid.on_key_down(Key::Char('a'), Modifiers::NONE);
    grid.edit_input("a");
    grid.on_key_down(Key::Enter, Modifiers::NONE);
    // Unchanged text is not dirty.
    grid.on_key_down(Key::F2, Modifiers::NONE);
    grid.on_key_down(Key::Enter, Modifiers::NONE);
    grid.on_key_down(Key::Char('b'), Modifiers::NONE);
    grid.on_key_down(Key::Tab, Modifiers::NONE);

    assert_eq!(grid.take_dirty_cells(), vec![(0, 0), (2, 0)]);
    assert!(grid.take_dirty_cells().is_empty());
}

#[test]
fn test_double_click_edits() {
    let mut grid = grid();
    let (x, y) = cell_center(2, 1);
    let token = grid
        .on_pointer_down(x, y, PointerButton::Primary, Modifiers::NONE, 2)
        .unwrap();
    assert!(token.is_none());
    assert_eq!(grid.editor().session().map(|s| (s.row, s.col)), Some((2, 1)));
}

#[test]
fn test_press_while_editing_commits() {
    let mut grid = grid();
    grid.on_key_down(Key::Char('h'), Modifiers::NONE);
    grid.edit_input("hi");
    let (x, y) = cell_center(6, 2);
    click(&mut grid, x, y);
    assert!(!grid.editor().is_editing());
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("hi"));
    assert_selection(&grid, 6, 2, 6, 2);
}

#[test]
fn test_backspace_clears_selection() {
    let mut grid = GridBuilder::new()
        .cell(0, 0, "a")
        .cell(1, 1, "b")
        .cell(4, 4, "c")
        .build();
    grid.select_range(CellRange::new(0, 0, 2, 2));
    assert!(grid.on_key_down(Key::Backspace, Modifiers::NONE));
    assert_eq!(grid.store().cell_text(0, 0), None);
    assert_eq!(grid.store().cell_text(1, 1), None);
    assert_eq!(grid.store().cell_text(4, 4).as_deref(), Some("c"));
}

#[test]
fn test_copy_paste_keeps_mark() {
    let mut grid = GridBuilder::new().cell(0, 0, "a").cell(0, 1, "b").build();
    grid.select_range(CellRange::new(0, 0, 0, 1));
    assert!(grid.on_key_down(Key::Char('c'), Modifiers::ctrl()));
    let mark = grid.clipboard().mark().unwrap();
    assert!(!mark.cut);

    grid.select(5, 5);
    assert!(grid.on_key_down(Key::Char('v'), Modifiers::ctrl()));
    assert_eq!(grid.store().cell_text(5, 5).as_deref(), Some("a"));
    assert_eq!(grid.store().cell_text(5, 6).as_deref(), Some("b"));
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("a"));
    assert_selection(&grid, 5, 5, 5, 6);
    assert!(grid.clipboard().mark().is_some());

    assert!(grid.on_key_down(Key::Escape, Modifiers::NONE));
    assert!(grid.clipboard().mark().is_none());
    assert!(!grid.on_key_down(Key::Escape, Modifiers::NONE));
}

#[test]
fn test_cut_paste_moves_and_consumes_mark() {
    let mut grid = GridBuilder::new().cell(0, 0, "a").build();
    grid.on_key_down(Key::Char('x'), Modifiers::ctrl());
    grid.select(3, 3);
    assert_eq!(grid.paste(), Some(CellRange::single(3, 3)));
    assert_eq!(grid.store().cell_text(0, 0), None);
    assert_eq!(grid.store().cell_text(3, 3).as_deref(), Some("a"));
    assert!(grid.clipboard().mark().is_none());
    assert_eq!(grid.paste(), None);
}

#[test]
fn test_refused_paste_keeps_cut_mark() {
    let mut grid = GridBuilder::new()
        .cell(0, 0, "a")
        .merges(vec![CellRange::new(5, 5, 6, 6)])
        .build();
    grid.cut();
    grid.select(5, 5);
    assert_eq!(grid.paste(), None);
    assert!(grid.clipboard().mark().unwrap().cut);
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("a"));
}

#[test]
fn test_drop_text_into_cell() {
    let mut grid = grid();
    let (x, y) = cell_center(4, 2);
    assert!(grid.on_drop(x, y, "hello"));
    assert_eq!(grid.store().cell_text(4, 2).as_deref(), Some("hello"));
    assert_selection(&grid, 4, 2, 4, 2);
    assert!(!grid.on_drop(x, y, ""));
}

#[test]
fn test_drop_object_at_pointer() {
    let mut grid = grid();
    grid.scroll_to(Axis::Row, 50.0);
    let payload = r#"{"kind":"image","src":"a.png","width":50,"height":40}"#;
    assert!(grid.on_drop(HEADER_WIDTH + 200.0, HEADER_HEIGHT + 100.0, payload));
    let object = grid.layer().iter().next().unwrap();
    assert_eq!((object.left, object.top), (200.0, 150.0));
    assert_eq!((object.width, object.height), (50.0, 40.0));
    assert_eq!(object.bound_range.sc.ri, 6);
}

#[test]
fn test_read_only_ignores_data_changes() {
    let mut grid = GridBuilder::new().cell(0, 0, "a").read_only().build();
    assert!(!grid.on_key_down(Key::Char('x'), Modifiers::NONE));
    assert!(!grid.on_key_down(Key::Backspace, Modifiers::NONE));
    assert!(!grid.on_key_down(Key::F2, Modifiers::NONE));
    assert!(!grid.on_key_down(Key::Char('c'), Modifiers::ctrl()));
    assert!(grid.paste().is_none());
    assert!(!grid.on_drop(100.0, 100.0, "text"));
    let (x, y) = cell_center(0, 0);
    grid.on_pointer_down(x, y, PointerButton::Primary, Modifiers::NONE, 2)
        .unwrap();
    assert!(!grid.editor().is_editing());
    assert_eq!(grid.store().cell_text(0, 0).as_deref(), Some("a"));
    assert!(grid
        .observer()
        .events
        .iter()
        .all(|e| !matches!(e, Recorded::EditStarted(..))));
}

#[test]
fn test_read_only_still_navigates() {
    let mut grid = GridBuilder::new().read_only().build();
    assert!(grid.on_key_down(Key::ArrowDown, Modifiers::NONE));
    assert!(grid.on_key_down(Key::ArrowRight, Modifiers::shift()));
    assert_selection(&grid, 1, 0, 1, 1);
    assert!(grid.on_wheel(0.0, 1.0));
    grid.freeze(2, 1);
    assert_eq!(grid.layout().frozen(), (2, 1));
}

#[test]
fn test_entering_read_only_drops_edit_and_mark() {
    let mut grid = grid();
    grid.copy();
    grid.on_key_down(Key::Char('q'), Modifiers::NONE);
    grid.set_mode(gridview::Mode::Read);
    assert!(!grid.editor().is_editing());
    assert!(grid.clipboard().mark().is_none());
    assert_eq!(grid.store().cell_text(0, 0), None);
}

#[test]
fn test_dom_key_names() {
    assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::ArrowLeft));
    assert_eq!(Key::from_dom("Esc"), Some(Key::Escape));
    assert_eq!(Key::from_dom("a"), Some(Key::Char('a')));
    assert_eq!(Key::from_dom(" "), Some(Key::Char(' ')));
    assert_eq!(Key::from_dom("Shift"), None);
    assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
    assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
}

#[test]
fn test_snapshot_serializes() {
    let mut grid = GridBuilder::new().freeze(1, 1).build();
    grid.select_range(CellRange::new(1, 1, 2, 3));
    let json = serde_json::to_value(grid.snapshot()).unwrap();
    assert_eq!(json["frozen"], serde_json::json!([1, 1]));
    assert_eq!(json["multiple"], true);
    assert_eq!(json["selection"]["endCol"], 3);
    assert!(json.get("scrollAnchor").is_some());
}
