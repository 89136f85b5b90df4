//! Channel addressing types.

use thiserror::Error;

/// Structured address of a single readout channel.
///
/// A channel sits in a region of the pad plane, in a row within that region,
/// at a pad position within that row. The mapping between this address and a
/// flat channel index is owned by [`Topology`](crate::topology::Topology)
/// and is fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadCoord {
    /// Region of the pad plane
    pub region: u8,
    /// Row within the region
    pub row: u8,
    /// Pad within the row
    pub pad: u16,
}

impl PadCoord {
    /// Create a new pad coordinate.
    pub fn new(region: u8, row: u8, pad: u16) -> Self {
        Self { region, row, pad }
    }
}

impl std::fmt::Display for PadCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "region {} row {} pad {}", self.region, self.row, self.pad)
    }
}

/// Errors for addresses that do not exist in a topology.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// Region index outside the pad plane
    #[error("region {0} does not exist")]
    InvalidRegion(u8),

    /// Row index outside the region
    #[error("row {row} does not exist in region {region}")]
    InvalidRow { region: u8, row: u8 },

    /// Pad index outside the row
    #[error("pad {pad} does not exist in region {region}, row {row}")]
    InvalidPad { region: u8, row: u8, pad: u16 },
}
