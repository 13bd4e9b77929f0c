//! Shared gesture drivers and assertion helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::viewer::{GestureToken, Modifiers, PointerButton};
use gridview::CellRange;

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Primary-button press with no modifiers; panics if the press is rejected.
pub fn press(grid: &mut TestGrid, x: f32, y: f32) -> Option<GestureToken> {
    grid.on_pointer_down(x, y, PointerButton::Primary, Modifiers::NONE, 1)
        .expect("pointer down rejected")
}

/// Press, move through `path`, and release at the last point.
pub fn drag(grid: &mut TestGrid, from: (f32, f32), path: &[(f32, f32)]) {
    let token = press(grid, from.0, from.1).expect("press did not start a gesture");
    for &(x, y) in path {
        grid.on_pointer_move(token, x, y).expect("stale token");
    }
    let end = path.last().copied().unwrap_or(from);
    grid.on_pointer_up(token, Some(end)).expect("stale token");
}

/// Press and release in place.
pub fn click(grid: &mut TestGrid, x: f32, y: f32) {
    if let Some(token) = press(grid, x, y) {
        grid.on_pointer_up(token, Some((x, y))).expect("stale token");
    }
}

#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[track_caller]
pub fn assert_selection(grid: &TestGrid, r1: u32, c1: u32, r2: u32, c2: u32) {
    assert_eq!(grid.selection(), CellRange::new(r1, c1, r2, c2));
}
