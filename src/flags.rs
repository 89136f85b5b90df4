//! Per-channel status flags.

use bitflags::bitflags;

bitflags! {
    /// Fine-grained status reasons recorded per readout channel by the
    /// pad-quality calibration.
    ///
    /// A channel can carry several reasons at once. Which reasons take a
    /// channel out of the derived map is decided by the exclusion mask, not
    /// by the flags themselves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChannelFlags: u16 {
        /// Channel participates normally in data taking
        const GOOD = 1 << 0;
        /// No signal observed
        const DEAD = 1 << 1;
        /// State could not be determined from the available statistics
        const UNDETERMINED = 1 << 2;
        /// Charge persistently at the saturation threshold
        const SATURATED = 1 << 3;
        /// Noise level above threshold
        const NOISY = 1 << 4;
        /// Gain persistently below threshold
        const LOW_GAIN = 1 << 5;
        /// Masked out by the operator
        const MASKED = 1 << 6;

        /// Default exclusion mask: reasons that remove a channel from the
        /// derived map.
        const EXCLUDED = Self::DEAD.bits() | Self::UNDETERMINED.bits() | Self::MASKED.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_mask_covers_dead_undetermined_masked() {
        assert!(ChannelFlags::EXCLUDED.contains(ChannelFlags::DEAD));
        assert!(ChannelFlags::EXCLUDED.contains(ChannelFlags::UNDETERMINED));
        assert!(ChannelFlags::EXCLUDED.contains(ChannelFlags::MASKED));
        assert!(!ChannelFlags::EXCLUDED.intersects(ChannelFlags::GOOD | ChannelFlags::NOISY));
    }

    #[test]
    fn unknown_bits_survive_a_roundtrip() {
        let raw = 0b1000_0000_0000_0010u16;
        let flags = ChannelFlags::from_bits_retain(raw);
        assert_eq!(flags.bits(), raw);
        assert!(flags.intersects(ChannelFlags::DEAD));
    }
}
