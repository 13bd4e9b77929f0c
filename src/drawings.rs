//! Floating objects (images and charts) layered over the grid.
//!
//! Objects are stored in sheet space and bound to the cells under their
//! corners. The binding is recomputed only when an object is inserted or a
//! move/resize gesture is finalized; live drags are pixel-only previews held
//! by the gesture itself.
//!
//! # Display position
//!
//! On screen an object sits at `header + stored - scroll` on each axis,
//! except on an axis where it lies entirely inside the frozen pixel extent:
//! there it is pinned like the frozen tracks it covers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::layout::{Axis, SheetLayout, Viewport};
use crate::types::{BoundRange, CellRef, FloatingObject, ObjectContent, PixelRect};

/// Persisted form: records keyed by id next to a `len` counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatingRecords {
    pub len: u32,
    #[serde(flatten)]
    pub objects: BTreeMap<String, FloatingObject>,
}

/// Backing collection of floating objects, in stacking order.
#[derive(Debug, Clone, Default)]
pub struct FloatingLayer {
    objects: Vec<FloatingObject>,
    len: u32,
    next_id: u64,
    active: Option<String>,
}

impl FloatingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the persisted `len` counter.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FloatingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Objects bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &FloatingObject> {
        self.objects.iter()
    }

    /// Create an object at a sheet-space rectangle and bind it to cells.
    /// Returns the new id.
    pub fn insert(
        &mut self,
        content: ObjectContent,
        rect: PixelRect,
        layout: &SheetLayout,
    ) -> String {
        let id = self.fresh_id();
        let object = FloatingObject {
            id,
            content,
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
            bound_range: bind(&rect, layout),
        };
        tracing::debug!(id = %object.id, kind = ?object.kind(), "floating object inserted");
        self.len += 1;
        let id = object.id.clone();
        self.objects.push(object);
        id
    }

    /// Store a final rectangle and rebind. Applying the same rectangle twice
    /// leaves the object unchanged.
    ///
    /// # Errors
    /// Returns `GridError::UnknownObject` if no object has this id.
    pub fn finalize(
        &mut self,
        id: &str,
        rect: PixelRect,
        layout: &SheetLayout,
    ) -> Result<&FloatingObject> {
        let object = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| GridError::UnknownObject(id.to_string()))?;
        object.set_rect(rect);
        object.bound_range = bind(&rect, layout);
        Ok(object)
    }

    /// Remove an object.
    ///
    /// # Errors
    /// Returns `GridError::UnknownObject` if no object has this id.
    pub fn remove(&mut self, id: &str) -> Result<FloatingObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| GridError::UnknownObject(id.to_string()))?;
        self.len = self.len.saturating_sub(1);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Ok(self.objects.remove(index))
    }

    /// Rebind every object, e.g. after tracks were resized.
    pub fn rebind_all(&mut self, layout: &SheetLayout) {
        for object in &mut self.objects {
            object.bound_range = bind(&object.rect(), layout);
        }
    }

    /// Object whose handles are live.
    pub fn active(&self) -> Option<&FloatingObject> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: Option<&str>) {
        self.active = id.filter(|id| self.get(id).is_some()).map(str::to_string);
    }

    /// View-space rectangle of an object.
    pub fn display_rect(
        object: &FloatingObject,
        layout: &SheetLayout,
        viewport: &Viewport,
    ) -> PixelRect {
        to_view(&object.rect(), layout, viewport)
    }

    /// Current display rectangle of every object, bottom to top.
    pub fn reposition(
        &self,
        layout: &SheetLayout,
        viewport: &Viewport,
    ) -> Vec<(String, PixelRect)> {
        self.objects
            .iter()
            .map(|o| (o.id.clone(), Self::display_rect(o, layout, viewport)))
            .collect()
    }

    /// Topmost object under a view-space point.
    pub fn hit_test(
        &self,
        x: f32,
        y: f32,
        layout: &SheetLayout,
        viewport: &Viewport,
    ) -> Option<&FloatingObject> {
        self.objects
            .iter()
            .rev()
            .find(|o| Self::display_rect(o, layout, viewport).contains(x, y))
    }

    pub fn records(&self) -> FloatingRecords {
        FloatingRecords {
            len: self.len,
            objects: self
                .objects
                .iter()
                .map(|o| (o.id.clone(), o.clone()))
                .collect(),
        }
    }

    /// Replace the collection with persisted records.
    pub fn load(&mut self, records: FloatingRecords) {
        self.objects = records.objects.into_values().collect();
        self.len = records.len;
        self.active = None;
        self.next_id = self.next_id.max(self.objects.len() as u64);
    }

    fn fresh_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("obj-{}", self.next_id);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn display_pos(
    start: f32,
    end: f32,
    axis: Axis,
    layout: &SheetLayout,
    viewport: &Viewport,
) -> f32 {
    let header = layout.axis(axis).header_size();
    let frozen = layout.frozen_extent(axis);
    if frozen > 0.0 && end <= frozen {
        header + start
    } else {
        header + start - viewport.scroll(axis)
    }
}

/// Map a sheet-space rectangle to view space.
pub fn to_view(rect: &PixelRect, layout: &SheetLayout, viewport: &Viewport) -> PixelRect {
    let left = display_pos(rect.left, rect.right(), Axis::Col, layout, viewport);
    let top = display_pos(rect.top, rect.bottom(), Axis::Row, layout, viewport);
    PixelRect::new(left, top, rect.width, rect.height)
}

/// Cells under the top-left and bottom-right corners of a sheet-space rectangle.
pub fn bind(rect: &PixelRect, layout: &SheetLayout) -> BoundRange {
    let (sri, sci) = layout.sheet_cell_at(rect.left, rect.top);
    let (eri, eci) = layout.sheet_cell_at(rect.right(), rect.bottom());
    BoundRange {
        sc: CellRef { ri: sri, ci: sci },
        ec: CellRef { ri: eri, ci: eci },
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::AxisStore;

    fn layout() -> SheetLayout {
        SheetLayout::new(
            AxisStore::new(100, 25.0, 5.0, 25.0),
            AxisStore::new(26, 100.0, 5.0, 60.0),
        )
    }

    fn image() -> ObjectContent {
        ObjectContent::Image {
            src: "cat.png".into(),
        }
    }

    #[test]
    fn test_insert_binds_cells() {
        let layout = layout();
        let mut layer = FloatingLayer::new();
        let id = layer.insert(image(), PixelRect::new(150.0, 30.0, 100.0, 50.0), &layout);
        let obj = layer.get(&id).unwrap();
        assert_eq!(obj.bound_range.sc, CellRef { ri: 1, ci: 1 });
        assert_eq!(obj.bound_range.ec, CellRef { ri: 3, ci: 2 });
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let layout = layout();
        let mut layer = FloatingLayer::new();
        let a = layer.insert(image(), PixelRect::default(), &layout);
        let b = layer.insert(image(), PixelRect::default(), &layout);
        assert_ne!(a, b);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let layout = layout();
        let mut layer = FloatingLayer::new();
        let id = layer.insert(image(), PixelRect::new(0.0, 0.0, 10.0, 10.0), &layout);
        let rect = PixelRect::new(210.0, 60.0, 50.0, 50.0);
        let first = layer.finalize(&id, rect, &layout).unwrap().clone();
        let second = layer.finalize(&id, rect, &layout).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.bound_range.sc, CellRef { ri: 2, ci: 2 });
    }

    #[test]
    fn test_remove_updates_counter() {
        let layout = layout();
        let mut layer = FloatingLayer::new();
        let id = layer.insert(image(), PixelRect::default(), &layout);
        layer.set_active(Some(&id));
        layer.remove(&id).unwrap();
        assert_eq!(layer.len(), 0);
        assert!(layer.active().is_none());
        assert!(matches!(layer.remove(&id), Err(GridError::UnknownObject(_))));
    }

    #[test]
    fn test_frozen_objects_do_not_shift() {
        let mut layout = layout();
        layout.set_freeze(4, 0);
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_scroll(Axis::Row, 100.0, &layout);
        vp.set_scroll(Axis::Col, 50.0, &layout);

        let mut layer = FloatingLayer::new();
        let pinned = layer.insert(image(), PixelRect::new(0.0, 10.0, 80.0, 50.0), &layout);
        let rect = FloatingLayer::display_rect(layer.get(&pinned).unwrap(), &layout, &vp);
        assert_eq!(rect.top, 25.0 + 10.0);
        assert_eq!(rect.left, 60.0 - 50.0);

        let scrolled = layer.insert(image(), PixelRect::new(0.0, 300.0, 80.0, 50.0), &layout);
        let rect = FloatingLayer::display_rect(layer.get(&scrolled).unwrap(), &layout, &vp);
        assert_eq!(rect.top, 25.0 + 300.0 - 100.0);
    }

    #[test]
    fn test_records_round_trip() {
        let layout = layout();
        let mut layer = FloatingLayer::new();
        layer.insert(image(), PixelRect::new(1.0, 2.0, 3.0, 4.0), &layout);
        let json = serde_json::to_string(&layer.records()).unwrap();
        let records: FloatingRecords = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len, 1);

        let mut restored = FloatingLayer::new();
        restored.load(records);
        assert_eq!(restored.len(), 1);
        let id = restored.insert(image(), PixelRect::default(), &layout);
        assert_eq!(id, "obj-2");
    }
}
