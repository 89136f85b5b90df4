//! Run-information collaborator.
//!
//! Resolves a run number to the time span of that run. Consumed as a black
//! box; the orchestrator caches the last resolution under the "still the
//! same run" discipline.

use std::collections::HashMap;

use thiserror::Error;

use crate::Timestamp;

/// Time span of a data-taking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInfo {
    /// Run number
    pub run: u32,
    /// Start of run
    pub start_time: Timestamp,
    /// End of run
    pub end_time: Timestamp,
}

/// Resolution failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RunInfoError {
    /// The service knows no run with this number
    #[error("unknown run number {0}")]
    UnknownRun(u32),
}

/// Resolves run numbers to timestamps.
pub trait RunInfoResolver: Send + Sync {
    /// Look up the time span of `run`.
    fn resolve(&self, run: u32) -> Result<RunInfo, RunInfoError>;
}

/// Fixed-table resolver for tests and offline replays.
#[derive(Debug, Default)]
pub struct RunTable {
    runs: HashMap<u32, RunInfo>,
}

impl RunTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run spanning `[start_time, end_time)`.
    pub fn insert(&mut self, run: u32, start_time: Timestamp, end_time: Timestamp) {
        self.runs.insert(
            run,
            RunInfo {
                run,
                start_time,
                end_time,
            },
        );
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_run(mut self, run: u32, start_time: Timestamp, end_time: Timestamp) -> Self {
        self.insert(run, start_time, end_time);
        self
    }
}

impl RunInfoResolver for RunTable {
    fn resolve(&self, run: u32) -> Result<RunInfo, RunInfoError> {
        self.runs
            .get(&run)
            .copied()
            .ok_or(RunInfoError::UnknownRun(run))
    }
}
