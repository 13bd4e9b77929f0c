use serde::{Deserialize, Serialize};

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Half-open containment: left/top edges inside, right/bottom edges outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

/// A cell coordinate as stored in object records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRef {
    pub ri: u32,
    pub ci: u32,
}

/// The cells a floating object covers, from its top-left to its bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundRange {
    /// Cell under the top-left corner
    pub sc: CellRef,
    /// Cell under the bottom-right corner
    pub ec: CellRef,
}

/// Kind of floating object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Image,
    Chart,
}

/// What a floating object displays. Opaque to the grid; handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectContent {
    /// A picture referenced by URL or data URI
    Image { src: String },
    /// A chart; `option` is passed through to the charting library untouched
    Chart {
        #[serde(rename = "chartType", default = "default_chart_type")]
        chart_type: String,
        #[serde(default)]
        option: serde_json::Value,
    },
}

fn default_chart_type() -> String {
    "bar".to_string()
}

impl ObjectContent {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Image { .. } => ObjectKind::Image,
            Self::Chart { .. } => ObjectKind::Chart,
        }
    }
}

/// A floating object as persisted by the storage collaborator.
///
/// `left`/`top` are sheet-space pixels: relative to the first row/column,
/// headers excluded, independent of scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingObject {
    pub id: String,
    #[serde(flatten)]
    pub content: ObjectContent,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub bound_range: BoundRange,
}

impl FloatingObject {
    pub fn kind(&self) -> ObjectKind {
        self.content.kind()
    }

    /// Stored sheet-space rectangle.
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.left, self.top, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: PixelRect) {
        self.left = rect.left;
        self.top = rect.top;
        self.width = rect.width;
        self.height = rect.height;
    }
}

/// Host request to place a new floating object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSpec {
    #[serde(flatten)]
    pub content: ObjectContent,
    #[serde(default = "default_object_width")]
    pub width: f32,
    #[serde(default = "default_object_height")]
    pub height: f32,
    /// Sheet-space position; defaults to the active cell's top-left corner.
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub top: Option<f32>,
}

fn default_object_width() -> f32 {
    400.0
}

fn default_object_height() -> f32 {
    300.0
}

impl ObjectSpec {
    pub fn image(src: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            content: ObjectContent::Image { src: src.into() },
            width,
            height,
            left: None,
            top: None,
        }
    }

    pub fn chart(chart_type: impl Into<String>, option: serde_json::Value) -> Self {
        Self {
            content: ObjectContent::Chart {
                chart_type: chart_type.into(),
                option,
            },
            width: default_object_width(),
            height: default_object_height(),
            left: None,
            top: None,
        }
    }

    /// Pin the object to a sheet-space position.
    pub fn at(mut self, left: f32, top: f32) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
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

    #[test]
    fn test_object_record_shape() {
        let obj = FloatingObject {
            id: "obj-1".into(),
            content: ObjectContent::Image {
                src: "a.png".into(),
            },
            left: 10.0,
            top: 20.0,
            width: 30.0,
            height: 40.0,
            bound_range: BoundRange::default(),
        };
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["src"], "a.png");
        assert_eq!(json["boundRange"]["sc"]["ri"], 0);

        let back: FloatingObject = serde_json::from_value(json).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_spec_defaults() {
        let spec: ObjectSpec = serde_json::from_str(r#"{"kind":"chart"}"#).unwrap();
        assert_eq!(spec.width, 400.0);
        assert_eq!(spec.height, 300.0);
        assert_eq!(spec.content.kind(), ObjectKind::Chart);
        assert!(spec.left.is_none());
    }

    #[test]
    fn test_pixel_rect_contains_is_half_open() {
        let r = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(!r.contains(10.0, 5.0));
    }
}
