//! Validity-windowed caching of conditions objects.
//!
//! Each fetched source is held in one [`CachedSlot`]: the last known-good
//! payload plus the [`ValidityWindow`] under which it is authoritative.
//! Staleness is only discovered on demand; there is no background refresh.

mod slot;
mod window;

pub use slot::{CachedSlot, SlotState};
pub use window::ValidityWindow;
