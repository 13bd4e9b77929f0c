//! Plain data types shared by the layout, selection and viewer modules.

mod drawing;
mod range;
mod settings;

pub use drawing::{
    BoundRange, CellRef, FloatingObject, ObjectContent, ObjectKind, ObjectSpec, PixelRect,
};
pub use range::{CellRange, SelectionType};
pub use settings::{ColSettings, GridSettings, Mode, RowSettings, ViewSize};
