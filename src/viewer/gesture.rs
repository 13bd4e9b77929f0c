//! Pointer gesture ownership.
//!
//! A press that starts a drag installs exactly one [`Gesture`] in the
//! [`GestureSlot`] and hands the caller a [`GestureToken`]. Moves and the
//! release must present that token; the release (or a cancel) always empties
//! the slot, whatever happens to the gesture itself.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::layout::Axis;
use crate::resize::{ObjectMove, ObjectResize, TrackResize};

/// Proof of ownership of the pointer channel for one press → release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GestureToken(u64);

impl GestureToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl From<GestureToken> for u64 {
    fn from(token: GestureToken) -> Self {
        token.0
    }
}

/// What a pointer drag is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Extending a cell selection
    Select,
    /// Extending a row (`Axis::Row`) or column selection across headers
    HeaderSelect(Axis),
    /// Dragging the selection corner
    Autofill,
    TrackResize(TrackResize),
    ObjectResize(ObjectResize),
    ObjectMove(ObjectMove),
}

#[derive(Debug, Clone)]
pub(crate) struct ActiveGesture {
    pub token: GestureToken,
    pub gesture: Gesture,
    /// Last pointer position seen, used when a release has no coordinates
    pub last: (f32, f32),
}

#[derive(Debug, Default, Clone)]
pub(crate) struct GestureSlot {
    active: Option<ActiveGesture>,
    issued: u64,
}

impl GestureSlot {
    pub fn gesture(&self) -> Option<&Gesture> {
        self.active.as_ref().map(|a| &a.gesture)
    }

    /// Fail if a gesture already owns the pointer.
    pub fn ensure_idle(&self) -> Result<()> {
        match &self.active {
            Some(active) => {
                tracing::warn!(token = active.token.0, "pointer down while a gesture is active");
                Err(GridError::GestureActive(active.token.0))
            }
            None => Ok(()),
        }
    }

    pub fn install(&mut self, gesture: Gesture, x: f32, y: f32) -> Result<GestureToken> {
        self.ensure_idle()?;
        self.issued += 1;
        let token = GestureToken(self.issued);
        tracing::debug!(token = token.0, ?gesture, "gesture installed");
        self.active = Some(ActiveGesture {
            token,
            gesture,
            last: (x, y),
        });
        Ok(token)
    }

    /// Uninstall the gesture owned by `token`.
    pub fn take(&mut self, token: GestureToken) -> Result<ActiveGesture> {
        match self.active.take() {
            Some(active) if active.token == token => Ok(active),
            other => {
                self.active = other;
                Err(GridError::StaleGesture(token.0))
            }
        }
    }

    /// Put back a gesture taken for a live update.
    pub fn restore(&mut self, active: ActiveGesture) {
        self.active = Some(active);
    }

    /// Uninstall whatever gesture is active.
    pub fn cancel(&mut self) -> Option<ActiveGesture> {
        self.active.take()
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
    fn test_single_owner() {
        let mut slot = GestureSlot::default();
        let token = slot.install(Gesture::Select, 0.0, 0.0).unwrap();
        assert!(matches!(
            slot.install(Gesture::Autofill, 0.0, 0.0),
            Err(GridError::GestureActive(id)) if id == token.id()
        ));
        slot.take(token).unwrap();
        assert!(slot.gesture().is_none());
    }

    #[test]
    fn test_stale_token_leaves_owner_installed() {
        let mut slot = GestureSlot::default();
        let old = slot.install(Gesture::Select, 0.0, 0.0).unwrap();
        slot.take(old).unwrap();
        let current = slot.install(Gesture::Select, 1.0, 1.0).unwrap();

        assert!(matches!(slot.take(old), Err(GridError::StaleGesture(_))));
        let active = slot.take(current).unwrap();
        assert_eq!(active.last, (1.0, 1.0));
        slot.restore(active);
        assert_eq!(slot.gesture(), Some(&Gesture::Select));
    }

    #[test]
    fn test_cancel_empties_slot() {
        let mut slot = GestureSlot::default();
        slot.install(Gesture::HeaderSelect(Axis::Row), 0.0, 0.0).unwrap();
        assert!(slot.cancel().is_some());
        assert!(slot.cancel().is_none());
    }
}
