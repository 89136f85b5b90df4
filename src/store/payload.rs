//! Typed conditions payloads and their versioned codec.
//!
//! Every payload type carries an explicit `format_version` field and decodes
//! through [`ConditionsPayload`]; there is no reflection-driven persistence.
//! A version this build does not read is rejected at decode time, which the
//! orchestrator treats like any other fetch failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::flags::ChannelFlags;
use crate::map::{FlagMap, StatusMap};
use crate::store::DecodeError;

/// Versioned encode/decode contract for conditions payloads.
pub trait ConditionsPayload: Sized {
    /// Format version this build writes and reads.
    const FORMAT_VERSION: u32;

    /// Encode the payload for storage.
    fn encode(&self) -> Vec<u8>;

    /// Decode a payload, rejecting unknown format versions.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed(err.to_string()))
}

fn check_version(found: u32, supported: u32) -> Result<(), DecodeError> {
    if found == supported {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedVersion { found, supported })
    }
}

/// Front-end electronics configuration at a point in time.
///
/// Channels behind a disabled front-end link deliver no data at all, so this
/// source contributes an already-boolean map: the set of disabled channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    format_version: u32,
    disabled_channels: Vec<u32>,
}

impl FrontendConfig {
    /// Config disabling the given flat channel indices.
    pub fn new(disabled_channels: Vec<u32>) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            disabled_channels,
        }
    }

    /// Flat indices of the channels disabled by this configuration.
    pub fn disabled_channels(&self) -> &[u32] {
        &self.disabled_channels
    }

    /// Boolean map over `total_channels` marking every disabled channel.
    ///
    /// Indices beyond the channel count are ignored; the address space of
    /// the running topology wins.
    pub fn to_status_map(&self, total_channels: usize) -> StatusMap {
        let mut map = StatusMap::new(total_channels);
        for &channel in &self.disabled_channels {
            if (channel as usize) < total_channels {
                map.set(channel as usize, true);
            }
        }
        map
    }
}

impl ConditionsPayload for FrontendConfig {
    const FORMAT_VERSION: u32 = 1;

    fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("frontend config serialization is infallible")
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let config: Self = decode_json(bytes)?;
        check_version(config.format_version, Self::FORMAT_VERSION)?;
        Ok(config)
    }
}

/// Per-channel status flags as delivered by the pad-quality calibration.
///
/// Stored as raw flag bits so that bits unknown to this build survive a
/// roundtrip; the exclusion mask only ever selects known bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadFlagPayload {
    format_version: u32,
    flag_bits: Vec<u16>,
}

impl PadFlagPayload {
    /// Payload from one flag value per channel, in flat index order.
    pub fn new(flags: &[ChannelFlags]) -> Self {
        Self::from_bits(flags.iter().map(|flag| flag.bits()).collect())
    }

    /// Payload from raw flag bits, in flat index order.
    pub fn from_bits(flag_bits: Vec<u16>) -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            flag_bits,
        }
    }

    /// Number of channels covered.
    pub fn len(&self) -> usize {
        self.flag_bits.len()
    }

    /// Whether the payload covers no channels at all.
    pub fn is_empty(&self) -> bool {
        self.flag_bits.is_empty()
    }

    /// Dense flag map over all covered channels.
    pub fn to_flag_map(&self) -> FlagMap {
        FlagMap::from_bits(&self.flag_bits)
    }
}

impl ConditionsPayload for PadFlagPayload {
    const FORMAT_VERSION: u32 = 1;

    fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("pad flag serialization is infallible")
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let payload: Self = decode_json(bytes)?;
        check_version(payload.format_version, Self::FORMAT_VERSION)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_config_roundtrip() {
        let config = FrontendConfig::new(vec![3, 17, 42]);
        let decoded = FrontendConfig::decode(&config.encode()).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn frontend_config_to_status_map_marks_disabled_channels() {
        let config = FrontendConfig::new(vec![0, 2, 9]);
        let map = config.to_status_map(4);
        assert_eq!(map.as_slice(), &[true, false, true, false]);
    }

    #[test]
    fn pad_flag_roundtrip_preserves_unknown_bits() {
        let payload = PadFlagPayload::from_bits(vec![0, 0b11, 0x8000]);
        let decoded = PadFlagPayload::decode(&payload.encode()).unwrap();
        assert_eq!(decoded.to_flag_map().as_slice()[2].bits(), 0x8000);
    }

    #[test]
    fn future_format_version_is_rejected() {
        let mut payload = PadFlagPayload::from_bits(vec![1, 2]);
        payload.format_version = PadFlagPayload::FORMAT_VERSION + 1;
        let bytes = serde_json::to_vec(&payload).unwrap();
        assert_eq!(
            PadFlagPayload::decode(&bytes),
            Err(DecodeError::UnsupportedVersion {
                found: PadFlagPayload::FORMAT_VERSION + 1,
                supported: PadFlagPayload::FORMAT_VERSION,
            })
        );
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        assert!(matches!(
            FrontendConfig::decode(b"not json"),
            Err(DecodeError::Malformed(_))
        ));
    }
}
