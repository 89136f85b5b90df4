//! Channel address space and linearization.
//!
//! The detector readout is addressed as region / row / pad. Everything else
//! in this crate works on flat channel indices, so the [`Topology`] trait
//! carries the one canonical linearization (region-major, row-major,
//! pad-minor) between the two. Implementations must be stable for the
//! lifetime of any orchestrator built on top of them; swapping the topology
//! requires a full reset of all cached maps.

mod types;

pub use types::{PadCoord, TopologyError};

/// Fixed channel address space of a detector readout.
///
/// The linearization is a bijection from `(region, row, pad)` onto
/// `[0, total_channels)` and must agree with the canonical iteration order
/// produced by [`channels`].
pub trait Topology: Send + Sync {
    /// Number of regions of the pad plane.
    fn region_count(&self) -> usize;

    /// Number of rows in the given region.
    fn row_count(&self, region: u8) -> usize;

    /// Number of pads in the given row.
    fn pad_count(&self, region: u8, row: u8) -> usize;

    /// Total number of readout channels.
    fn total_channels(&self) -> usize;

    /// Flat channel index of a structured address.
    fn linearize(&self, coord: PadCoord) -> Result<usize, TopologyError>;
}

/// Iterates all channels of a topology in canonical order.
///
/// Canonical order is region-major, row-major, pad-minor, so the emitted
/// flat index is simply the running position of the iterator.
pub fn channels(topology: &dyn Topology) -> ChannelIter<'_> {
    ChannelIter {
        topology,
        region: 0,
        row: 0,
        pad: 0,
        index: 0,
    }
}

/// Iterator over `(flat_index, PadCoord)` pairs in canonical order.
pub struct ChannelIter<'a> {
    topology: &'a dyn Topology,
    region: u8,
    row: u8,
    pad: u16,
    index: usize,
}

impl Iterator for ChannelIter<'_> {
    type Item = (usize, PadCoord);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if (self.region as usize) >= self.topology.region_count() {
                return None;
            }
            if (self.row as usize) >= self.topology.row_count(self.region) {
                self.region += 1;
                self.row = 0;
                self.pad = 0;
                continue;
            }
            if (self.pad as usize) >= self.topology.pad_count(self.region, self.row) {
                self.row += 1;
                self.pad = 0;
                continue;
            }
            let item = (self.index, PadCoord::new(self.region, self.row, self.pad));
            self.pad += 1;
            self.index += 1;
            return Some(item);
        }
    }
}

/// Concrete [`Topology`] built from an explicit shape description.
///
/// Holds the pad count of every row and precomputes the row and region
/// offsets used by the linearization. Suitable for embedders without their
/// own geometry service and for tests.
#[derive(Debug, Clone)]
pub struct GridTopology {
    pads_per_row: Vec<Vec<u16>>,
    row_offsets: Vec<Vec<usize>>,
    total: usize,
}

impl GridTopology {
    /// Create a topology from the pad count of every row, outer index
    /// region, inner index row.
    pub fn new(pads_per_row: Vec<Vec<u16>>) -> Self {
        let mut row_offsets = Vec::with_capacity(pads_per_row.len());
        let mut total = 0usize;
        for rows in &pads_per_row {
            let mut offsets = Vec::with_capacity(rows.len());
            for &pads in rows {
                offsets.push(total);
                total += pads as usize;
            }
            row_offsets.push(offsets);
        }
        Self {
            pads_per_row,
            row_offsets,
            total,
        }
    }

    /// Create a topology where every region has the same number of rows and
    /// every row the same number of pads.
    pub fn uniform(regions: usize, rows: usize, pads: u16) -> Self {
        Self::new(vec![vec![pads; rows]; regions])
    }
}

impl Topology for GridTopology {
    fn region_count(&self) -> usize {
        self.pads_per_row.len()
    }

    fn row_count(&self, region: u8) -> usize {
        self.pads_per_row
            .get(region as usize)
            .map_or(0, |rows| rows.len())
    }

    fn pad_count(&self, region: u8, row: u8) -> usize {
        self.pads_per_row
            .get(region as usize)
            .and_then(|rows| rows.get(row as usize))
            .map_or(0, |&pads| pads as usize)
    }

    fn total_channels(&self) -> usize {
        self.total
    }

    fn linearize(&self, coord: PadCoord) -> Result<usize, TopologyError> {
        let rows = self
            .pads_per_row
            .get(coord.region as usize)
            .ok_or(TopologyError::InvalidRegion(coord.region))?;
        let pads = *rows.get(coord.row as usize).ok_or(TopologyError::InvalidRow {
            region: coord.region,
            row: coord.row,
        })?;
        if coord.pad >= pads {
            return Err(TopologyError::InvalidPad {
                region: coord.region,
                row: coord.row,
                pad: coord.pad,
            });
        }
        Ok(self.row_offsets[coord.region as usize][coord.row as usize] + coord.pad as usize)
    }
}
