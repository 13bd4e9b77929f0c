//! Per-axis track storage.
//!
//! An `AxisStore` owns every row (or every column) of a sheet: its size, its
//! hidden flag, and a cumulative offset table that is rebuilt after each
//! mutation so offset and hit queries stay O(1) / O(log n).

use serde::{Deserialize, Serialize};

/// Which dimension a track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal tracks stacked vertically (heights).
    Row,
    /// Vertical tracks laid out horizontally (widths).
    Col,
}

/// A single row or column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stored size in pixels, kept even while hidden.
    pub size: f32,
    /// Hidden tracks contribute 0 to every size query.
    pub hidden: bool,
}

impl Track {
    /// Size as seen by layout (0 when hidden).
    pub fn effective_size(&self) -> f32 {
        if self.hidden {
            0.0
        } else {
            self.size
        }
    }
}

/// Ordered tracks of one axis plus the constants that govern them.
#[derive(Debug, Clone)]
pub struct AxisStore {
    tracks: Vec<Track>,
    /// `offsets[i]` = sum of effective sizes of tracks `0..i`; one extra final edge.
    offsets: Vec<f32>,
    default_size: f32,
    min_size: f32,
    header_size: f32,
}

impl AxisStore {
    /// Create `len` tracks of `default_size`.
    pub fn new(len: u32, default_size: f32, min_size: f32, header_size: f32) -> Self {
        let default_size = default_size.max(0.0);
        let mut store = Self {
            tracks: vec![
                Track {
                    size: default_size,
                    hidden: false,
                };
                len as usize
            ],
            offsets: Vec::new(),
            default_size,
            min_size: min_size.max(0.0),
            header_size: header_size.max(0.0),
        };
        store.rebuild_offsets();
        store
    }

    /// Create a store from explicit sizes (used by tests and replay scripts).
    pub fn from_sizes(sizes: &[f32], min_size: f32, header_size: f32) -> Self {
        let default_size = sizes.first().copied().unwrap_or(0.0);
        let mut store = Self {
            tracks: sizes
                .iter()
                .map(|&size| Track {
                    size: size.max(0.0),
                    hidden: false,
                })
                .collect(),
            offsets: Vec::new(),
            default_size,
            min_size: min_size.max(0.0),
            header_size: header_size.max(0.0),
        };
        store.rebuild_offsets();
        store
    }

    /// Number of tracks.
    pub fn len(&self) -> u32 {
        u32::try_from(self.tracks.len()).unwrap_or(u32::MAX)
    }

    /// True when the axis has no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Last valid index (0 for an empty axis).
    pub fn last_index(&self) -> u32 {
        self.len().saturating_sub(1)
    }

    /// Clamp an index into `0..len`.
    pub fn clamp_index(&self, index: u32) -> u32 {
        index.min(self.last_index())
    }

    pub fn header_size(&self) -> f32 {
        self.header_size
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn default_size(&self) -> f32 {
        self.default_size
    }

    /// Track record at `index`.
    pub fn track(&self, index: u32) -> Option<&Track> {
        self.tracks.get(index as usize)
    }

    /// Effective size: 0 if hidden or out of range.
    pub fn size(&self, index: u32) -> f32 {
        self.track(index).map_or(0.0, Track::effective_size)
    }

    /// Stored size regardless of visibility.
    pub fn raw_size(&self, index: u32) -> f32 {
        self.track(index).map_or(0.0, |t| t.size)
    }

    pub fn is_hidden(&self, index: u32) -> bool {
        self.track(index).is_some_and(|t| t.hidden)
    }

    /// Set a track's size, clamped to the axis minimum. Returns the applied size.
    pub fn set_size(&mut self, index: u32, size: f32) -> f32 {
        let applied = size.max(self.min_size);
        if let Some(track) = self.tracks.get_mut(index as usize) {
            track.size = applied;
            self.rebuild_offsets();
        }
        applied
    }

    pub fn set_hidden(&mut self, index: u32, hidden: bool) {
        if let Some(track) = self.tracks.get_mut(index as usize) {
            if track.hidden != hidden {
                track.hidden = hidden;
                self.rebuild_offsets();
            }
        }
    }

    /// Sum of effective sizes over `from..to` (`None` = to the end).
    pub fn total_size(&self, from: u32, to: Option<u32>) -> f32 {
        let end = to.map_or(self.len(), |t| t.min(self.len()));
        if from >= end {
            return 0.0;
        }
        self.offset(end) - self.offset(from)
    }

    /// Extent of the whole axis.
    pub fn total(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Cumulative offset of track `index` (sum of sizes of `0..index`).
    /// Indexes past the end return the final edge.
    pub fn offset(&self, index: u32) -> f32 {
        self.offsets
            .get(index as usize)
            .or_else(|| self.offsets.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Track containing the axis-space position `pos`.
    ///
    /// Negative positions give 0, positions past the end give the last index.
    /// Zero-sized tracks never contain a position: when several tracks share
    /// an offset the last of them (the one that actually has extent) wins.
    pub fn index_at(&self, pos: f32) -> u32 {
        if self.tracks.is_empty() || pos < 0.0 {
            return 0;
        }
        let edges = self
            .offsets
            .get(..self.tracks.len())
            .unwrap_or(&self.offsets);
        let after = edges.partition_point(|&edge| edge <= pos);
        self.clamp_index(u32::try_from(after.saturating_sub(1)).unwrap_or(u32::MAX))
    }

    /// First non-hidden track at or after `index`.
    pub fn next_visible(&self, index: u32) -> Option<u32> {
        (index..self.len()).find(|&i| self.size(i) > 0.0)
    }

    /// Last non-hidden track at or before `index`.
    pub fn prev_visible(&self, index: u32) -> Option<u32> {
        (0..=index.min(self.last_index()))
            .rev()
            .find(|&i| self.size(i) > 0.0)
    }

    /// Insert `count` default-sized tracks before `at`.
    pub fn insert(&mut self, at: u32, count: u32) {
        let at = (at as usize).min(self.tracks.len());
        let fresh = Track {
            size: self.default_size,
            hidden: false,
        };
        self.tracks
            .splice(at..at, std::iter::repeat(fresh).take(count as usize));
        self.rebuild_offsets();
    }

    /// Remove `count` tracks starting at `at`.
    pub fn delete(&mut self, at: u32, count: u32) {
        let start = (at as usize).min(self.tracks.len());
        let end = start.saturating_add(count as usize).min(self.tracks.len());
        self.tracks.drain(start..end);
        self.rebuild_offsets();
    }

    fn rebuild_offsets(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.tracks.len() + 1);
        let mut acc = 0.0_f32;
        for track in &self.tracks {
            self.offsets.push(acc);
            acc += track.effective_size();
        }
        self.offsets.push(acc);
        debug_assert!(
            self.offsets.iter().all(|&o| o >= 0.0),
            "cumulative track offset went negative"
        );
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

    fn three_rows() -> AxisStore {
        AxisStore::from_sizes(&[25.0, 25.0, 25.0], 5.0, 0.0)
    }

    #[test]
    fn test_offsets() {
        let store = three_rows();
        assert_eq!(store.offset(0), 0.0);
        assert_eq!(store.offset(1), 25.0);
        assert_eq!(store.offset(3), 75.0);
        assert_eq!(store.offset(10), 75.0);
        assert_eq!(store.total(), 75.0);
    }

    #[test]
    fn test_hidden_track_has_no_size() {
        let mut store = three_rows();
        store.set_hidden(1, true);
        assert_eq!(store.size(1), 0.0);
        assert_eq!(store.raw_size(1), 25.0);
        assert_eq!(store.total_size(0, Some(3)), 50.0);
        assert_eq!(store.offset(2), 25.0);

        store.set_hidden(1, false);
        assert_eq!(store.total_size(0, None), 75.0);
    }

    #[test]
    fn test_set_size_clamps_to_minimum() {
        let mut store = three_rows();
        assert_eq!(store.set_size(0, 2.0), 5.0);
        assert_eq!(store.size(0), 5.0);
        assert_eq!(store.offset(1), 5.0);
    }

    #[test]
    fn test_index_at() {
        let store = three_rows();
        assert_eq!(store.index_at(-3.0), 0);
        assert_eq!(store.index_at(0.0), 0);
        assert_eq!(store.index_at(24.9), 0);
        assert_eq!(store.index_at(25.0), 1);
        assert_eq!(store.index_at(74.0), 2);
        assert_eq!(store.index_at(500.0), 2);
    }

    #[test]
    fn test_index_at_skips_hidden() {
        let mut store = three_rows();
        store.set_hidden(1, true);
        assert_eq!(store.index_at(25.0), 2);
        assert_eq!(store.index_at(30.0), 2);
    }

    #[test]
    fn test_insert_shifts_following_tracks() {
        let mut store = AxisStore::from_sizes(&[10.0, 20.0, 30.0], 1.0, 0.0);
        store.set_hidden(2, true);
        store.insert(1, 2);
        assert_eq!(store.len(), 5);
        assert_eq!(store.raw_size(0), 10.0);
        assert_eq!(store.raw_size(1), 10.0);
        assert_eq!(store.raw_size(3), 20.0);
        assert!(store.is_hidden(4));
        assert_eq!(store.raw_size(4), 30.0);
    }

    #[test]
    fn test_delete_shifts_following_tracks() {
        let mut store = AxisStore::from_sizes(&[10.0, 20.0, 30.0, 40.0], 1.0, 0.0);
        store.delete(1, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.raw_size(1), 40.0);
        assert_eq!(store.total(), 50.0);

        store.delete(5, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_visible_neighbours() {
        let mut store = three_rows();
        store.set_hidden(1, true);
        assert_eq!(store.next_visible(1), Some(2));
        assert_eq!(store.prev_visible(1), Some(0));
        store.set_hidden(2, true);
        assert_eq!(store.next_visible(1), None);
    }
}
