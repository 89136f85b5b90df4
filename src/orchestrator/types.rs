//! Source identities, selection set and orchestrator configuration.

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

use crate::flags::ChannelFlags;
use crate::runinfo::RunInfoError;
use crate::Timestamp;

/// Load arguments below this value are run numbers, at or above it they are
/// millisecond timestamps. Run numbers live in the low millions; epoch
/// milliseconds passed 10^12 decades ago, so the two ranges cannot collide.
pub const RUN_NUMBER_CUTOFF: Timestamp = 1_000_000_000;

/// One of the fixed inputs to the derived dead-channel map.
///
/// The membership of this set is fixed at compile time; only which sources
/// are *enabled* changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Front-end electronics configuration, an already-boolean source
    Frontend,
    /// Pad-quality flags, reduced to booleans through the exclusion mask
    PadFlags,
}

impl Source {
    /// All sources in their fixed refresh order: front-end config first,
    /// pad flags second. The order affects only log interleaving, never the
    /// composed result.
    pub const ALL: [Source; 2] = [Source::Frontend, Source::PadFlags];

    /// Key of this source's object in the conditions store.
    pub fn store_key(self) -> &'static str {
        match self {
            Source::Frontend => "frontend/config",
            Source::PadFlags => "calib/pad-status",
        }
    }

    /// This source as a one-element selection set.
    pub fn as_set(self) -> SourceSet {
        match self {
            Source::Frontend => SourceSet::FRONTEND,
            Source::PadFlags => SourceSet::PAD_FLAGS,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Frontend => write!(f, "frontend-config"),
            Source::PadFlags => write!(f, "pad-flags"),
        }
    }
}

bitflags! {
    /// Selection of sources participating in composition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SourceSet: u8 {
        /// Front-end electronics configuration
        const FRONTEND = 1 << 0;
        /// Pad-quality flags
        const PAD_FLAGS = 1 << 1;
        /// Every source
        const ALL = Self::FRONTEND.bits() | Self::PAD_FLAGS.bits();
    }
}

/// Orchestrator tuning knobs.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Sources participating in composition
    pub enabled: SourceSet,
    /// Flag bits that take a channel out of the derived map
    pub exclusion_mask: ChannelFlags,
    /// Boundary between run numbers and timestamps in `load` arguments
    pub run_number_cutoff: Timestamp,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            enabled: SourceSet::ALL,
            exclusion_mask: ChannelFlags::EXCLUDED,
            run_number_cutoff: RUN_NUMBER_CUTOFF,
        }
    }
}

/// The only error `load` returns.
///
/// Per-source fetch failures are deliberately not here: they are logged,
/// latched on the slot and served stale (fail-open). Without a resolvable
/// timestamp, however, there is nothing to serve.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The run-info collaborator could not resolve the requested run
    #[error("cannot resolve run {run} to a timestamp")]
    RunResolution {
        run: u32,
        #[source]
        source: RunInfoError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_selection_covers_every_source() {
        for source in Source::ALL {
            assert!(SourceSet::ALL.contains(source.as_set()));
        }
    }

    #[test]
    fn store_keys_are_distinct() {
        assert_ne!(Source::Frontend.store_key(), Source::PadFlags.store_key());
    }

    #[test]
    fn default_config_enables_everything() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.enabled, SourceSet::ALL);
        assert_eq!(config.exclusion_mask, ChannelFlags::EXCLUDED);
    }
}
