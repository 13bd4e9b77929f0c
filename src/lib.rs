//! gridview - interactive spreadsheet grid surface
//!
//! Everything a spreadsheet grid needs between raw pointer/keyboard input
//! and a renderer, with no drawing of its own:
//! - Per-axis track sizes with hidden tracks, insert and delete
//! - Pixel ↔ cell mapping across headers, frozen panes and merged cells
//! - Scroll state kept as an anchor track plus a sub-pixel offset
//! - Range selection, keyboard navigation and the autofill handle
//! - Row/column and floating object resizing and moving
//! - One-gesture-at-a-time pointer dispatch with explicit tokens
//!
//! Cell content lives behind [`store::CellStore`]; rendering and object
//! mounting happen in a [`store::GridObserver`].
//!
//! # Usage (Rust)
//!
//! ```
//! use gridview::{GridSettings, GridView, MemoryCellStore, NullObserver};
//!
//! let mut grid = GridView::new(GridSettings::default(), MemoryCellStore::new(), NullObserver);
//! grid.select(3, 2);
//! assert_eq!(grid.selection().start_row, 3);
//! ```

pub mod drawings;
pub mod editor;
pub mod error;
pub mod layout;
pub mod resize;
pub mod selection;
pub mod store;
pub mod types;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{GridError, Result};
pub use store::{CellStore, GridObserver, MemoryCellStore, NullObserver};
pub use types::*;
pub use viewer::GridView;

/// Get the library version
#[must_use]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen::prelude::wasm_bindgen)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
