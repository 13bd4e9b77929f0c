//! Grid builders and a recording observer for integration tests.
//!
//! Default geometry (unless overridden): 100 rows × 25px, 26 columns ×
//! 100px, a 60px row-header strip, a 25px column-header strip and a
//! 1024×768 view. Cell `(r, c)` therefore starts at view
//! `(60 + 100c, 25 + 25r)` while unscrolled.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use gridview::resize::ResizeCommit;
use gridview::{
    CellRange, FloatingObject, GridObserver, GridSettings, GridView, MemoryCellStore, Mode,
    PixelRect,
};

pub const HEADER_WIDTH: f32 = 60.0;
pub const HEADER_HEIGHT: f32 = 25.0;
pub const COL_WIDTH: f32 = 100.0;
pub const ROW_HEIGHT: f32 = 25.0;

/// One notification seen by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Attach(String),
    Detach(String),
    Position(String, PixelRect),
    ResizeFinished(ResizeCommit),
    ObjectResizeFinished(FloatingObject),
    MoveFinished(FloatingObject),
    CellSelected(u32, u32),
    RangeSelected(CellRange),
    EditStarted(u32, u32, String),
}

/// Observer that counts renders and keeps every other notification.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub renders: u32,
    pub events: Vec<Recorded>,
}

impl RecordingObserver {
    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.renders = 0;
        self.events.clear();
    }

    pub fn last_position(&self, id: &str) -> Option<PixelRect> {
        self.events.iter().rev().find_map(|e| match e {
            Recorded::Position(pid, rect) if pid == id => Some(*rect),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&Recorded) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl GridObserver for RecordingObserver {
    fn render(&mut self) {
        self.renders += 1;
    }

    fn attach_object(&mut self, object: &FloatingObject) {
        self.events.push(Recorded::Attach(object.id.clone()));
    }

    fn detach_object(&mut self, id: &str) {
        self.events.push(Recorded::Detach(id.to_string()));
    }

    fn position_object(&mut self, id: &str, rect: PixelRect) {
        self.events.push(Recorded::Position(id.to_string(), rect));
    }

    fn resize_finished(&mut self, commit: &ResizeCommit) {
        self.events.push(Recorded::ResizeFinished(*commit));
    }

    fn object_resize_finished(&mut self, object: &FloatingObject) {
        self.events
            .push(Recorded::ObjectResizeFinished(object.clone()));
    }

    fn move_finished(&mut self, object: &FloatingObject) {
        self.events.push(Recorded::MoveFinished(object.clone()));
    }

    fn cell_selected(&mut self, row: u32, col: u32) {
        self.events.push(Recorded::CellSelected(row, col));
    }

    fn range_selected(&mut self, range: &CellRange) {
        self.events.push(Recorded::RangeSelected(*range));
    }

    fn edit_started(&mut self, row: u32, col: u32, text: &str) {
        self.events
            .push(Recorded::EditStarted(row, col, text.to_string()));
    }
}

pub type TestGrid = GridView<MemoryCellStore, RecordingObserver>;

/// Builder for a [`TestGrid`].
#[derive(Debug, Default)]
pub struct GridBuilder {
    settings: GridSettings,
    store: MemoryCellStore,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, len: u32) -> Self {
        self.settings.row.len = len;
        self
    }

    pub fn cols(mut self, len: u32) -> Self {
        self.settings.col.len = len;
        self
    }

    pub fn view(mut self, width: f32, height: f32) -> Self {
        self.settings.view.width = width;
        self.settings.view.height = height;
        self
    }

    pub fn freeze(mut self, rows: u32, cols: u32) -> Self {
        self.settings.freeze = (rows, cols);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.settings.mode = Mode::Read;
        self
    }

    pub fn merges(mut self, merges: Vec<CellRange>) -> Self {
        self.store = self.store.with_merges(merges);
        self
    }

    pub fn cell(mut self, row: u32, col: u32, text: &str) -> Self {
        use gridview::CellStore;
        self.store.set_cell_text(row, col, text);
        self
    }

    /// Build the grid with an empty recording (construction is not counted).
    pub fn build(self) -> TestGrid {
        let mut grid = GridView::new(self.settings, self.store, RecordingObserver::default());
        grid.observer_mut().clear();
        grid
    }
}

/// A default-sized grid.
pub fn grid() -> TestGrid {
    GridBuilder::new().build()
}

/// View-space centre of cell `(row, col)` in an unscrolled, unfrozen
/// default grid.
pub fn cell_center(row: u32, col: u32) -> (f32, f32) {
    (
        HEADER_WIDTH + COL_WIDTH * col as f32 + COL_WIDTH / 2.0,
        HEADER_HEIGHT + ROW_HEIGHT * row as f32 + ROW_HEIGHT / 2.0,
    )
}
