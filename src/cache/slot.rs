//! Per-source cache slot with staleness tracking.

use crate::cache::ValidityWindow;
use crate::Timestamp;

/// Freshness of a [`CachedSlot`] relative to a request timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never successfully fetched
    Empty,
    /// Payload present and its window covers the timestamp
    Valid,
    /// Payload present but outside its window
    Stale,
}

/// One slot holding the last successfully fetched payload of a source plus
/// its validity window. The unit of staleness tracking.
///
/// A slot only ever moves forward: a successful [`store`](Self::store)
/// replaces payload and window as a single visible update, while a failed
/// refresh leaves both untouched and only latches
/// [`last_fetch_failed`](Self::last_fetch_failed). The last known-good
/// payload therefore stays readable until a later fetch succeeds.
#[derive(Debug, Clone)]
pub struct CachedSlot<T> {
    payload: Option<T>,
    window: ValidityWindow,
    last_fetch_failed: bool,
}

impl<T> Default for CachedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CachedSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            payload: None,
            window: ValidityWindow::unset(),
            last_fetch_failed: false,
        }
    }

    /// Whether the slot must be refreshed to serve `timestamp`.
    ///
    /// True when no payload was ever fetched or when the window does not
    /// cover the timestamp. A preceding failed refresh does not change the
    /// answer; it already left the window stale, so the next call retries.
    pub fn needs_refresh(&self, timestamp: Timestamp) -> bool {
        self.payload.is_none() || !self.window.is_valid(timestamp)
    }

    /// Install a successfully fetched payload and its window, clearing the
    /// failure latch.
    pub fn store(&mut self, payload: T, window: ValidityWindow) {
        self.payload = Some(payload);
        self.window = window;
        self.last_fetch_failed = false;
    }

    /// Record a failed refresh attempt.
    ///
    /// Payload and window are deliberately not touched, so previously valid
    /// data stays served and the next `needs_refresh` check still triggers
    /// a retry.
    pub fn mark_failed(&mut self) {
        self.last_fetch_failed = true;
    }

    /// Drop the payload and window, returning the slot to its initial state.
    pub fn clear(&mut self) {
        self.payload = None;
        self.window = ValidityWindow::unset();
        self.last_fetch_failed = false;
    }

    /// Last successfully fetched payload, if any.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Validity window of the current payload. Meaningless while the slot
    /// is empty.
    pub fn window(&self) -> ValidityWindow {
        self.window
    }

    /// Whether the most recent refresh attempt failed.
    pub fn last_fetch_failed(&self) -> bool {
        self.last_fetch_failed
    }

    /// Lifecycle state relative to `timestamp`.
    pub fn state(&self, timestamp: Timestamp) -> SlotState {
        if self.payload.is_none() {
            SlotState::Empty
        } else if self.window.is_valid(timestamp) {
            SlotState::Valid
        } else {
            SlotState::Stale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_needs_refresh_for_any_timestamp() {
        let slot: CachedSlot<u32> = CachedSlot::new();
        assert!(slot.needs_refresh(0));
        assert!(slot.needs_refresh(i64::MAX));
        assert_eq!(slot.state(0), SlotState::Empty);
    }

    #[test]
    fn store_makes_slot_valid_inside_window() {
        let mut slot = CachedSlot::new();
        slot.store(7u32, ValidityWindow::new(100, 200));
        assert!(!slot.needs_refresh(150));
        assert!(slot.needs_refresh(250));
        assert_eq!(slot.state(150), SlotState::Valid);
        assert_eq!(slot.state(250), SlotState::Stale);
        assert_eq!(slot.payload(), Some(&7));
    }

    #[test]
    fn failed_refresh_preserves_payload_and_window() {
        let mut slot = CachedSlot::new();
        slot.store(7u32, ValidityWindow::new(100, 200));
        slot.mark_failed();
        assert_eq!(slot.payload(), Some(&7));
        assert_eq!(slot.window(), ValidityWindow::new(100, 200));
        assert!(slot.last_fetch_failed());
        // still stale outside the window, so the next call retries
        assert!(slot.needs_refresh(250));
    }

    #[test]
    fn store_clears_failure_latch() {
        let mut slot = CachedSlot::new();
        slot.mark_failed();
        slot.store(1u32, ValidityWindow::new(0, 10));
        assert!(!slot.last_fetch_failed());
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut slot = CachedSlot::new();
        slot.store(1u32, ValidityWindow::new(0, 10));
        slot.clear();
        assert_eq!(slot.state(5), SlotState::Empty);
        assert!(slot.payload().is_none());
        assert!(!slot.window().is_set());
    }
}
