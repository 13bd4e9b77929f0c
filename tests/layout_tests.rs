//! Track store and coordinate mapper tests
//!
//! Pixel ↔ cell mapping across headers, hidden tracks, frozen panes and
//! merged cells, plus structural track edits.

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
use gridview::layout::{Axis, AxisStore, SheetLayout, Viewport};
use gridview::CellRange;

fn layout(rows: &[f32], cols: &[f32], header: f32) -> SheetLayout {
    SheetLayout::new(
        AxisStore::from_sizes(rows, 5.0, header),
        AxisStore::from_sizes(cols, 5.0, header),
    )
}

#[test]
fn test_cell_at_three_rows_no_header() {
    let layout = layout(&[25.0, 25.0, 25.0], &[100.0, 100.0], 0.0);
    let vp = Viewport::new(400.0, 400.0);
    assert_eq!(layout.cell_at(50.0, 30.0, &vp).0, 1);
    assert_eq!(layout.rect_of(1, 0, &vp).top, 25.0);
    assert_eq!(layout.rect_of(1, 1, &vp).top, 25.0);
}

#[test]
fn test_hidden_row_shrinks_total() {
    let mut rows = AxisStore::from_sizes(&[25.0, 25.0, 25.0], 5.0, 0.0);
    rows.set_hidden(1, true);
    assert_eq!(rows.total_size(0, Some(3)), 50.0);
    assert_eq!(rows.size(1), 0.0);
    assert_eq!(rows.raw_size(1), 25.0);
    // Row 2 now starts where row 1 used to.
    assert_eq!(rows.offset(2), 25.0);
    assert_eq!(rows.index_at(30.0), 2);
}

#[test]
fn test_offsets_follow_set_size() {
    let mut rows = AxisStore::new(10, 20.0, 10.0, 0.0);
    assert_eq!(rows.offset(5), 100.0);
    assert_eq!(rows.set_size(2, 4.0), 10.0);
    assert_eq!(rows.offset(5), 90.0);
    rows.set_size(2, 50.0);
    assert_eq!(rows.offset(5), 130.0);
    assert_eq!(rows.total(), 230.0);
}

#[test]
fn test_round_trip_every_visible_cell() {
    let mut layout = layout(&[20.0, 30.0, 0.0, 25.0, 40.0, 25.0, 25.0, 60.0], &[50.0; 6], 20.0);
    layout.rows_mut().set_hidden(5, true);
    layout.set_freeze(2, 1);
    let mut vp = Viewport::new(300.0, 160.0);
    vp.set_scroll(Axis::Row, 30.0, &layout);
    vp.set_scroll(Axis::Col, 50.0, &layout);

    for row in 0..8 {
        for col in 0..6 {
            let rect = layout.rect_of(row, col, &vp);
            if rect.width <= 0.0 || rect.height <= 0.0 {
                continue;
            }
            // Scrolled cells that slid under the frozen panes are not reachable.
            if row >= 2 && rect.top < 20.0 + layout.frozen_extent(Axis::Row) {
                continue;
            }
            if col >= 1 && rect.left < 20.0 + layout.frozen_extent(Axis::Col) {
                continue;
            }
            let hit = layout.cell_at(rect.left + 1.0, rect.top + 1.0, &vp);
            assert_eq!(hit, (row, col), "rect {rect:?}");
        }
    }
}

#[test]
fn test_out_of_range_pixels_clamp() {
    let layout = layout(&[25.0; 4], &[100.0; 3], 10.0);
    let vp = Viewport::new(200.0, 200.0);
    assert_eq!(layout.cell_at(-50.0, -50.0, &vp), (0, 0));
    assert_eq!(layout.cell_at(10_000.0, 10_000.0, &vp), (3, 2));
}

#[test]
fn test_frozen_rows_do_not_scroll() {
    let mut layout = layout(&[25.0; 40], &[100.0; 3], 0.0);
    layout.set_freeze(2, 0);
    let mut vp = Viewport::new(300.0, 200.0);
    vp.set_scroll(Axis::Row, 100.0, &layout);

    assert_eq!(layout.cell_at(10.0, 10.0, &vp).0, 0);
    assert_eq!(layout.cell_at(10.0, 30.0, &vp).0, 1);
    // First scrolled pixel after the frozen band: row 2 + 100px = row 6.
    assert_eq!(layout.cell_at(10.0, 50.0, &vp).0, 6);
    assert_eq!(layout.rect_of(1, 0, &vp).top, 25.0);
    assert_eq!(layout.rect_of(6, 0, &vp).top, 50.0);
}

#[test]
fn test_merge_maps_to_origin() {
    let mut layout = layout(&[25.0; 10], &[100.0; 5], 0.0);
    layout.set_merges(vec![CellRange::new(1, 1, 2, 3)]);
    let vp = Viewport::new(600.0, 300.0);

    assert_eq!(layout.cell_at(350.0, 60.0, &vp), (1, 1));
    let rect = layout.rect_of(1, 1, &vp);
    assert_eq!((rect.left, rect.top, rect.width, rect.height), (100.0, 25.0, 300.0, 50.0));
}

#[test]
fn test_insert_rows_shift_hidden_state() {
    let mut rows = AxisStore::new(5, 25.0, 5.0, 0.0);
    rows.set_hidden(3, true);
    rows.set_size(4, 40.0);
    rows.insert(1, 2);
    assert_eq!(rows.len(), 7);
    assert!(rows.is_hidden(5));
    assert_eq!(rows.size(6), 40.0);
    assert_eq!(rows.size(1), 25.0);

    rows.delete(1, 2);
    assert_eq!(rows.len(), 5);
    assert!(rows.is_hidden(3));
    assert_eq!(rows.size(4), 40.0);
}

#[test]
fn test_grid_insert_rows_moves_freeze() {
    let mut grid = GridBuilder::new().freeze(3, 0).build();
    grid.insert_tracks(Axis::Row, 1, 2);
    assert_eq!(grid.layout().frozen(), (5, 0));
    assert_eq!(grid.layout().rows().len(), 102);
    assert_eq!(grid.observer().renders, 1);

    grid.delete_tracks(Axis::Row, 0, 4);
    assert_eq!(grid.layout().frozen(), (1, 0));
}

#[test]
fn test_deleting_tracks_clamps_selection() {
    let mut grid = GridBuilder::new().rows(10).build();
    grid.select(9, 0);
    grid.delete_tracks(Axis::Row, 5, 5);
    assert_eq!(grid.layout().rows().len(), 5);
    assert_eq!(grid.selection(), CellRange::single(4, 0));
}
