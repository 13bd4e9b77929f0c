use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Whether the grid accepts data mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full interaction (default)
    #[default]
    Edit,
    /// Selection and scrolling only; mutations are silent no-ops
    Read,
}

/// Row axis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RowSettings {
    /// Number of rows
    pub len: u32,
    /// Default row height in pixels
    pub height: f32,
    /// Smallest height a drag-resize may produce
    pub min_height: f32,
    /// Height of the column-header strip
    pub header_height: f32,
}

impl Default for RowSettings {
    fn default() -> Self {
        Self {
            len: 100,
            height: 25.0,
            min_height: 25.0,
            header_height: 25.0,
        }
    }
}

/// Column axis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColSettings {
    /// Number of columns
    pub len: u32,
    /// Default column width in pixels
    pub width: f32,
    /// Smallest width a drag-resize may produce
    pub min_width: f32,
    /// Width of the row-header strip
    pub index_width: f32,
}

impl Default for ColSettings {
    fn default() -> Self {
        Self {
            len: 26,
            width: 100.0,
            min_width: 60.0,
            index_width: 60.0,
        }
    }
}

/// Visible surface size in pixels (headers included)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewSize {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Grid configuration, usually supplied by the host as JSON.
///
/// Every field has a default so partial documents are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettings {
    pub mode: Mode,
    pub view: ViewSize,
    pub row: RowSettings,
    pub col: ColSettings,
    /// Frozen `(rows, cols)`
    pub freeze: (u32, u32),
}

impl GridSettings {
    /// Parse settings from a JSON document.
    ///
    /// # Errors
    /// Returns `GridError::Settings` if the document is not valid JSON or has
    /// fields of the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == Mode::Read
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
    fn test_defaults() {
        let s = GridSettings::default();
        assert_eq!(s.mode, Mode::Edit);
        assert_eq!(s.row.height, 25.0);
        assert_eq!(s.col.width, 100.0);
        assert_eq!(s.col.min_width, 60.0);
        assert_eq!(s.freeze, (0, 0));
    }

    #[test]
    fn test_partial_document() {
        let s = GridSettings::from_json(r#"{"mode":"read","row":{"len":10},"freeze":[1,2]}"#)
            .unwrap();
        assert!(s.is_read_only());
        assert_eq!(s.row.len, 10);
        assert_eq!(s.row.height, 25.0);
        assert_eq!(s.col.len, 26);
        assert_eq!(s.freeze, (1, 2));
    }

    #[test]
    fn test_invalid_document() {
        assert!(GridSettings::from_json(r#"{"mode":"sideways"}"#).is_err());
        assert!(GridSettings::from_json("not json").is_err());
    }
}
