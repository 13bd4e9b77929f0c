//! Floating object layer tests
//!
//! Insertion, cell binding, scroll/freeze positioning, pointer move and
//! handle resize through the grid, and persisted records.

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
use gridview::drawings::FloatingRecords;
use gridview::error::GridError;
use gridview::layout::Axis;
use gridview::resize::Handle;
use gridview::viewer::{CursorHint, Gesture, HitTarget};
use gridview::{BoundRange, CellRef, ObjectKind, ObjectSpec, PixelRect};

fn with_image(left: f32, top: f32, width: f32, height: f32) -> (TestGrid, String) {
    let mut grid = grid();
    let id = grid
        .insert_floating_object(ObjectSpec::image("cat.png", width, height).at(left, top))
        .unwrap();
    grid.observer_mut().clear();
    (grid, id)
}

/// View-space point of a sheet-space point on an unscrolled default grid.
fn view(x: f32, y: f32) -> (f32, f32) {
    (HEADER_WIDTH + x, HEADER_HEIGHT + y)
}

#[test]
fn test_insert_binds_corner_cells() {
    let mut grid = grid();
    let id = grid
        .insert_floating_object(ObjectSpec::image("cat.png", 150.0, 60.0).at(120.0, 30.0))
        .unwrap();
    let object = grid.layer().get(&id).unwrap();
    assert_eq!(object.kind(), ObjectKind::Image);
    assert_eq!(
        object.bound_range,
        BoundRange {
            sc: CellRef { ri: 1, ci: 1 },
            ec: CellRef { ri: 3, ci: 2 },
        }
    );
    assert_eq!(grid.observer().renders, 1);
    assert_eq!(grid.observer().events[0], Recorded::Attach(id.clone()));
    assert_eq!(
        grid.observer().last_position(&id),
        Some(PixelRect::new(180.0, 55.0, 150.0, 60.0))
    );
}

#[test]
fn test_ids_are_unique() {
    let mut grid = grid();
    let a = grid
        .insert_floating_object(ObjectSpec::image("a.png", 40.0, 40.0))
        .unwrap();
    let b = grid
        .insert_floating_object(ObjectSpec::chart("line", serde_json::json!({})))
        .unwrap();
    assert_ne!(a, b);
    assert_eq!(grid.layer().len(), 2);
    assert_eq!(grid.layer().get(&b).unwrap().kind(), ObjectKind::Chart);
}

#[test]
fn test_scroll_repositions_objects() {
    let (mut grid, id) = with_image(120.0, 300.0, 100.0, 100.0);
    grid.scroll_to(Axis::Row, 100.0);
    assert_eq!(
        grid.observer().last_position(&id),
        Some(PixelRect::new(180.0, 225.0, 100.0, 100.0))
    );
    assert_eq!(grid.observer().renders, 1);
}

#[test]
fn test_object_inside_frozen_rows_is_pinned() {
    let mut grid = GridBuilder::new().freeze(4, 0).build();
    let pinned = grid
        .insert_floating_object(ObjectSpec::image("a.png", 50.0, 50.0).at(0.0, 20.0))
        .unwrap();
    let straddling = grid
        .insert_floating_object(ObjectSpec::image("b.png", 50.0, 50.0).at(0.0, 80.0))
        .unwrap();
    grid.scroll_to(Axis::Row, 200.0);

    let pinned_rect = grid.observer().last_position(&pinned).unwrap();
    assert_eq!(pinned_rect.top, HEADER_HEIGHT + 20.0);
    let straddling_rect = grid.observer().last_position(&straddling).unwrap();
    assert_eq!(straddling_rect.top, HEADER_HEIGHT + 80.0 - 200.0);
}

#[test]
fn test_hit_test_prefers_topmost_object() {
    let mut grid = grid();
    let below = grid
        .insert_floating_object(ObjectSpec::image("a.png", 100.0, 100.0).at(0.0, 0.0))
        .unwrap();
    let above = grid
        .insert_floating_object(ObjectSpec::image("b.png", 100.0, 100.0).at(50.0, 50.0))
        .unwrap();
    let (x, y) = view(75.0, 75.0);
    assert_eq!(grid.hit_test(x, y), HitTarget::Object(above));
    let (x, y) = view(10.0, 10.0);
    assert_eq!(grid.hit_test(x, y), HitTarget::Object(below));
    assert_eq!(grid.hover(x, y), CursorHint::Move);
}

#[test]
fn test_drag_object_moves_and_rebinds() {
    let (mut grid, id) = with_image(0.0, 0.0, 80.0, 40.0);
    let (x, y) = view(10.0, 10.0);
    let token = press(&mut grid, x, y).unwrap();
    assert!(matches!(grid.active_gesture(), Some(Gesture::ObjectMove(_))));
    assert_eq!(grid.layer().active().map(|o| o.id.as_str()), Some(id.as_str()));

    grid.on_pointer_move(token, x + 200.0, y + 100.0).unwrap();
    // Live drags only move the element; the stored rectangle waits for release.
    assert_eq!(grid.layer().get(&id).unwrap().left, 0.0);
    assert_eq!(
        grid.observer().last_position(&id),
        Some(PixelRect::new(HEADER_WIDTH + 200.0, HEADER_HEIGHT + 100.0, 80.0, 40.0))
    );

    grid.on_pointer_up(token, None).unwrap();
    let object = grid.layer().get(&id).unwrap();
    assert_eq!((object.left, object.top), (200.0, 100.0));
    assert_eq!(object.bound_range.sc, CellRef { ri: 4, ci: 2 });
    assert_eq!(object.bound_range.ec, CellRef { ri: 5, ci: 2 });
    assert_eq!(
        grid.observer()
            .count(|e| matches!(e, Recorded::MoveFinished(o) if o.left == 200.0)),
        1
    );
}

#[test]
fn test_move_is_clamped_to_sheet_origin() {
    let (mut grid, id) = with_image(20.0, 20.0, 80.0, 40.0);
    let (x, y) = view(30.0, 30.0);
    let token = press(&mut grid, x, y).unwrap();
    grid.on_pointer_move(token, x - 500.0, y - 500.0).unwrap();
    grid.on_pointer_up(token, None).unwrap();
    let object = grid.layer().get(&id).unwrap();
    assert_eq!((object.left, object.top), (0.0, 0.0));
}

#[test]
fn test_move_is_clamped_to_scrolled_window() {
    let (mut grid, id) = with_image(0.0, 1100.0, 80.0, 40.0);
    grid.scroll_to(Axis::Row, 1000.0);
    let (x, y) = (HEADER_WIDTH + 10.0, HEADER_HEIGHT + 110.0);
    assert_eq!(grid.hit_test(x, y), HitTarget::Object(id.clone()));

    let token = press(&mut grid, x, y).unwrap();
    grid.on_pointer_move(token, x, y - 500.0).unwrap();
    let shown = grid.observer().last_position(&id).unwrap();
    assert_eq!(shown.top, HEADER_HEIGHT);

    grid.on_pointer_up(token, None).unwrap();
    let object = grid.layer().get(&id).unwrap();
    assert_eq!((object.left, object.top), (0.0, 1000.0));
    assert_eq!(object.bound_range.sc, CellRef { ri: 40, ci: 0 });
}

#[test]
fn test_move_is_clamped_to_window_end() {
    let (mut grid, id) = with_image(0.0, 0.0, 80.0, 40.0);
    let (x, y) = view(10.0, 10.0);
    let token = press(&mut grid, x, y).unwrap();
    grid.on_pointer_move(token, x + 5000.0, y + 5000.0).unwrap();
    grid.on_pointer_up(token, None).unwrap();
    let object = grid.layer().get(&id).unwrap();
    assert_eq!((object.left, object.top), (964.0 - 80.0, 743.0 - 40.0));
}

#[test]
fn test_handle_resize_through_grid() {
    let (mut grid, id) = with_image(100.0, 50.0, 50.0, 80.0);
    // First click activates the object and its handles.
    let (x, y) = view(120.0, 80.0);
    click(&mut grid, x, y);
    let (hx, hy) = view(150.0, 130.0);
    assert_eq!(
        grid.hit_test(hx, hy),
        HitTarget::ObjectHandle(id.clone(), Handle::BottomRight)
    );
    assert_eq!(grid.hover(hx, hy).css(), "nwse-resize");

    let token = press(&mut grid, hx, hy).unwrap();
    grid.on_pointer_move(token, hx + 30.0, hy + 50.0).unwrap();
    grid.on_pointer_up(token, None).unwrap();

    let object = grid.layer().get(&id).unwrap();
    assert_eq!(
        (object.left, object.top, object.width, object.height),
        (100.0, 50.0, 80.0, 130.0)
    );
    assert_eq!(
        grid.observer()
            .count(|e| matches!(e, Recorded::ObjectResizeFinished(_))),
        1
    );
}

#[test]
fn test_cancel_restores_object() {
    let (mut grid, id) = with_image(0.0, 0.0, 80.0, 40.0);
    let (x, y) = view(10.0, 10.0);
    let token = press(&mut grid, x, y).unwrap();
    grid.on_pointer_move(token, x + 300.0, y).unwrap();
    assert!(grid.cancel_gesture());

    assert_eq!(grid.layer().get(&id).unwrap().left, 0.0);
    assert_eq!(
        grid.observer().last_position(&id),
        Some(PixelRect::new(HEADER_WIDTH, HEADER_HEIGHT, 80.0, 40.0))
    );
    assert!(matches!(
        grid.on_pointer_up(token, None),
        Err(GridError::StaleGesture(_))
    ));
    assert_eq!(
        grid.observer()
            .count(|e| matches!(e, Recorded::MoveFinished(_))),
        0
    );
}

#[test]
fn test_clicking_cell_deactivates_object() {
    let (mut grid, _id) = with_image(0.0, 0.0, 80.0, 40.0);
    let (x, y) = view(10.0, 10.0);
    click(&mut grid, x, y);
    assert!(grid.layer().active().is_some());
    let (x, y) = cell_center(10, 5);
    click(&mut grid, x, y);
    assert!(grid.layer().active().is_none());
}

#[test]
fn test_track_resize_rebinds_objects() {
    let (mut grid, id) = with_image(250.0, 0.0, 40.0, 20.0);
    assert_eq!(grid.layer().get(&id).unwrap().bound_range.sc.ci, 2);
    grid.set_track_size(Axis::Col, 0, 200.0);
    assert_eq!(grid.layer().get(&id).unwrap().bound_range.sc.ci, 1);
}

#[test]
fn test_delete_object() {
    let (mut grid, id) = with_image(0.0, 0.0, 80.0, 40.0);
    grid.delete_floating_object(&id).unwrap();
    assert!(grid.layer().get(&id).is_none());
    assert_eq!(grid.observer().events, vec![Recorded::Detach(id.clone())]);
    assert!(matches!(
        grid.delete_floating_object(&id),
        Err(GridError::UnknownObject(_))
    ));
}

#[test]
fn test_move_floating_object_rebinds() {
    let (mut grid, id) = with_image(0.0, 0.0, 80.0, 40.0);
    grid.move_floating_object(&id, PixelRect::new(300.0, 250.0, 80.0, 40.0))
        .unwrap();
    let object = grid.layer().get(&id).unwrap();
    assert_eq!(object.bound_range.sc, CellRef { ri: 10, ci: 3 });
    assert!(grid.observer().events.contains(&Recorded::Detach(id.clone())));
    assert!(grid.observer().events.contains(&Recorded::Attach(id.clone())));
}

#[test]
fn test_records_round_trip_through_json() {
    let (source, id) = with_image(10.0, 20.0, 30.0, 40.0);
    let json = serde_json::to_value(source.floating_records()).unwrap();
    assert_eq!(json["len"], 1);
    assert_eq!(json[id.as_str()]["kind"], "image");
    assert_eq!(json[id.as_str()]["boundRange"]["sc"]["ri"], 0);

    let records: FloatingRecords = serde_json::from_value(json).unwrap();
    let mut other = grid();
    other.load_floating_records(records);
    assert_eq!(
        other.layer().get(&id).unwrap().rect(),
        source.layer().get(&id).unwrap().rect()
    );
    assert!(other.observer().events.contains(&Recorded::Attach(id.clone())));
}

#[test]
fn test_read_only_objects_do_not_drag() {
    let mut grid = GridBuilder::new().build();
    let id = grid
        .insert_floating_object(ObjectSpec::image("a.png", 80.0, 40.0).at(0.0, 0.0))
        .unwrap();
    grid.set_mode(gridview::Mode::Read);
    let (x, y) = view(10.0, 10.0);
    assert!(press(&mut grid, x, y).is_none());
    assert_eq!(grid.hover(x, y), CursorHint::Default);
    assert!(grid.delete_floating_object(&id).is_ok());
    assert!(grid.layer().get(&id).is_some());
}
