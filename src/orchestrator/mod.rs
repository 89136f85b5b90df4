//! Orchestration of the refresh-then-compose cycle.
//!
//! [`StatusMapOrchestrator`] owns one cache slot per fetched source, the
//! per-source boolean maps and the derived dead-channel map, and exposes the
//! public read/write surface of the crate.

mod engine;
mod types;

pub use engine::StatusMapOrchestrator;
pub use types::{LoadError, OrchestratorConfig, Source, SourceSet, RUN_NUMBER_CUTOFF};
