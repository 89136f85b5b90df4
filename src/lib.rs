//! deadmap - derived dead-channel map construction for a padded detector readout
//!
//! This library maintains a per-channel "is this readout channel usable" map
//! over a fixed channel address space. The map is composed from several
//! independently fetched sources, each held in a validity-windowed cache slot
//! and refreshed on demand from a remote conditions store.
//!
//! # High-Level API
//!
//! The [`orchestrator`] module provides the public surface. Construct a
//! [`StatusMapOrchestrator`](orchestrator::StatusMapOrchestrator) with its
//! three collaborators and drive it with `load`:
//!
//! ```ignore
//! use deadmap::orchestrator::StatusMapOrchestrator;
//! use deadmap::runinfo::RunTable;
//! use deadmap::store::MemoryStore;
//! use deadmap::topology::GridTopology;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let topology = Arc::new(GridTopology::uniform(4, 16, 96));
//! let runs = Arc::new(RunTable::new());
//!
//! let mut orchestrator = StatusMapOrchestrator::new(store, topology, runs);
//! orchestrator.load(1_700_000_000_000)?;
//! let dead = orchestrator.derived_map();
//! ```

pub mod cache;
pub mod flags;
pub mod logging;
pub mod map;
pub mod orchestrator;
pub mod runinfo;
pub mod store;
pub mod topology;

/// Milliseconds since the Unix epoch, the time axis of all validity windows.
pub type Timestamp = i64;

/// Version of the deadmap library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
