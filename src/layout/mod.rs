//! Layout engine for track sizes, cell positions and viewport management.
//!
//! This module handles:
//! - Per-axis track storage with hidden tracks and cumulative offsets
//! - Pixel ↔ cell mapping aware of headers, frozen panes and merges
//! - Viewport scroll state, clamping and keep-visible scrolling

mod sheet_layout;
mod tracks;
mod viewport;

pub use sheet_layout::{CellHit, SheetLayout};
pub use tracks::{Axis, AxisStore, Track};
pub use viewport::{AxisScroll, Viewport};
