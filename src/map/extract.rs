//! Mask-based extraction of a boolean map from a flag map.

use crate::flags::ChannelFlags;
use crate::map::{FlagMap, StatusMap};

/// Extract the boolean "channel excluded" view of a flag map.
///
/// Allocates a fresh all-`false` map and sets an entry `true` iff the
/// channel carries at least one of the bits selected by `mask`. This is a
/// full recomputation: the output depends only on the current flag map and
/// mask, never on a previous result. Per-channel independence makes the
/// result order-insensitive.
pub fn extract_masked(flags: &FlagMap, mask: ChannelFlags) -> StatusMap {
    let mut out = StatusMap::new(flags.len());
    for (index, &channel_flags) in flags.as_slice().iter().enumerate() {
        if channel_flags.intersects(mask) {
            out.set(index, true);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_selects_nothing() {
        let flags = FlagMap::from_bits(&[0b01, 0b11, 0xFFFF]);
        let map = extract_masked(&flags, ChannelFlags::empty());
        assert_eq!(map.count_set(), 0);
    }

    #[test]
    fn full_mask_selects_any_nonzero_flags() {
        let flags = FlagMap::from_bits(&[0b00, 0b01, 0b10, 0b1000_0000]);
        let map = extract_masked(&flags, ChannelFlags::from_bits_retain(u16::MAX));
        assert_eq!(map.as_slice(), &[false, true, true, true]);
    }

    #[test]
    fn single_bit_mask() {
        // raw flags 0b00, 0b11, 0b01, 0b10 against the DEAD bit
        let flags = FlagMap::from_bits(&[
            0,
            (ChannelFlags::GOOD | ChannelFlags::DEAD).bits(),
            ChannelFlags::DEAD.bits(),
            ChannelFlags::GOOD.bits(),
        ]);
        let map = extract_masked(&flags, ChannelFlags::DEAD);
        assert_eq!(map.as_slice(), &[false, true, true, false]);
    }

    #[test]
    fn extraction_does_not_accumulate() {
        let flags = FlagMap::from_bits(&[ChannelFlags::DEAD.bits(), 0]);
        let first = extract_masked(&flags, ChannelFlags::DEAD);
        let second = extract_masked(&flags, ChannelFlags::NOISY);
        assert_eq!(first.as_slice(), &[true, false]);
        assert_eq!(second.count_set(), 0);
    }
}
