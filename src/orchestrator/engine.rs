//! Refresh-then-compose cycle over the configured sources.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::{CachedSlot, SlotState, ValidityWindow};
use crate::map::{compose, extract_masked, StatusMap};
use crate::orchestrator::{LoadError, OrchestratorConfig, Source, SourceSet};
use crate::runinfo::{RunInfo, RunInfoResolver};
use crate::store::{
    ConditionsPayload, ConditionsStore, FrontendConfig, PadFlagPayload, StoreError, StoredObject,
};
use crate::topology::Topology;
use crate::Timestamp;

/// Owns the per-source cache slots and the derived dead-channel map and
/// drives the refresh-then-compose cycle on every [`load`](Self::load).
///
/// Single-threaded and pull-based: staleness is only discovered and repaired
/// on an explicit `load` call, which blocks on the store collaborator. All
/// mutation goes through `&mut self` and all reads hand out `&`, so a reader
/// can never observe a partially composed map; callers that need access from
/// several execution contexts must serialize externally.
///
/// Per-source fetch failures are fail-open: logged, latched on the slot, and
/// the last known-good payload keeps being served until a later fetch
/// succeeds. Only a failed run-number resolution aborts a `load`.
pub struct StatusMapOrchestrator {
    store: Arc<dyn ConditionsStore>,
    topology: Arc<dyn Topology>,
    run_info: Arc<dyn RunInfoResolver>,
    config: OrchestratorConfig,
    frontend: CachedSlot<FrontendConfig>,
    pad_flags: CachedSlot<PadFlagPayload>,
    resolved_run: Option<RunInfo>,
    last_request: Option<Timestamp>,
    frontend_map: StatusMap,
    pad_flags_map: StatusMap,
    derived: StatusMap,
}

impl StatusMapOrchestrator {
    /// Create an orchestrator with the default configuration: all sources
    /// enabled, default exclusion mask.
    pub fn new(
        store: Arc<dyn ConditionsStore>,
        topology: Arc<dyn Topology>,
        run_info: Arc<dyn RunInfoResolver>,
    ) -> Self {
        Self::with_config(store, topology, run_info, OrchestratorConfig::default())
    }

    /// Create an orchestrator with an explicit configuration.
    pub fn with_config(
        store: Arc<dyn ConditionsStore>,
        topology: Arc<dyn Topology>,
        run_info: Arc<dyn RunInfoResolver>,
        config: OrchestratorConfig,
    ) -> Self {
        let total = topology.total_channels();
        Self {
            store,
            run_info,
            config,
            frontend: CachedSlot::new(),
            pad_flags: CachedSlot::new(),
            resolved_run: None,
            last_request: None,
            frontend_map: StatusMap::new(total),
            pad_flags_map: StatusMap::new(total),
            derived: StatusMap::new(total),
            topology,
        }
    }

    /// Bring the derived map up to date for a timestamp or run number.
    ///
    /// Values below the configured cutoff are run numbers and are resolved
    /// through the run-info collaborator first. Every stale source is then
    /// refreshed in the fixed order of [`Source::ALL`] and the derived map
    /// is recomposed from the enabled sources.
    pub fn load(&mut self, timestamp_or_run: i64) -> Result<(), LoadError> {
        let timestamp = self.resolve_timestamp(timestamp_or_run)?;
        self.last_request = Some(timestamp);
        self.refresh_frontend(timestamp);
        self.refresh_pad_flags(timestamp);
        self.recompose();
        Ok(())
    }

    /// Enable or disable a source's participation in composition.
    ///
    /// Recomposes the derived map immediately (eager policy); the next
    /// `load` still refreshes the source's cache slot as usual.
    pub fn set_enabled(&mut self, source: Source, enabled: bool) {
        self.config.enabled.set(source.as_set(), enabled);
        self.recompose();
    }

    /// Currently enabled sources.
    pub fn enabled(&self) -> SourceSet {
        self.config.enabled
    }

    /// Inject a source's boolean map directly, bypassing fetch and validity
    /// tracking. Escape hatch for locally computed maps and test fixtures;
    /// the injected map participates in composition immediately but is
    /// replaced again by the next successful fetch of that source.
    ///
    /// The map must cover the topology's channel count; a mismatch is a
    /// programming error and panics.
    pub fn set_status_map(&mut self, source: Source, map: StatusMap) {
        assert_eq!(
            map.len(),
            self.topology.total_channels(),
            "status map does not cover the topology channel count"
        );
        match source {
            Source::Frontend => self.frontend_map = map,
            Source::PadFlags => self.pad_flags_map = map,
        }
        self.recompose();
    }

    /// The derived dead-channel map as of the last recomposition.
    pub fn derived_map(&self) -> &StatusMap {
        &self.derived
    }

    /// A single source's boolean map, for diagnostics.
    pub fn source_map(&self, source: Source) -> &StatusMap {
        match source {
            Source::Frontend => &self.frontend_map,
            Source::PadFlags => &self.pad_flags_map,
        }
    }

    /// Whether the source would be refreshed by a `load` at the most
    /// recently requested timestamp. `true` before the first load.
    pub fn is_source_stale(&self, source: Source) -> bool {
        match self.last_request {
            Some(timestamp) => match source {
                Source::Frontend => self.frontend.needs_refresh(timestamp),
                Source::PadFlags => self.pad_flags.needs_refresh(timestamp),
            },
            None => true,
        }
    }

    /// Whether the most recent refresh attempt of the source failed.
    pub fn fetch_failed(&self, source: Source) -> bool {
        match source {
            Source::Frontend => self.frontend.last_fetch_failed(),
            Source::PadFlags => self.pad_flags.last_fetch_failed(),
        }
    }

    /// Lifecycle state of the source relative to the most recently
    /// requested timestamp.
    pub fn source_state(&self, source: Source) -> SlotState {
        match self.last_request {
            Some(timestamp) => match source {
                Source::Frontend => self.frontend.state(timestamp),
                Source::PadFlags => self.pad_flags.state(timestamp),
            },
            None => SlotState::Empty,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Drop every cached payload and map back to the cold state.
    ///
    /// Required when the topology collaborator is replaced; cached maps are
    /// only meaningful for the address space they were built against.
    pub fn reset(&mut self) {
        let total = self.topology.total_channels();
        self.frontend.clear();
        self.pad_flags.clear();
        self.resolved_run = None;
        self.last_request = None;
        self.frontend_map = StatusMap::new(total);
        self.pad_flags_map = StatusMap::new(total);
        self.recompose();
    }

    fn resolve_timestamp(&mut self, timestamp_or_run: i64) -> Result<Timestamp, LoadError> {
        if timestamp_or_run >= self.config.run_number_cutoff || timestamp_or_run < 0 {
            return Ok(timestamp_or_run);
        }
        let run = timestamp_or_run as u32;
        if let Some(info) = self.resolved_run {
            if info.run == run {
                debug!(run, "run mapping still current");
                return Ok(info.start_time);
            }
        }
        match self.run_info.resolve(run) {
            Ok(info) => {
                info!(
                    run,
                    start_time = info.start_time,
                    end_time = info.end_time,
                    "resolved run to its time span"
                );
                self.resolved_run = Some(info);
                Ok(info.start_time)
            }
            Err(source) => Err(LoadError::RunResolution { run, source }),
        }
    }

    fn refresh_frontend(&mut self, timestamp: Timestamp) {
        if !self.frontend.needs_refresh(timestamp) {
            debug!(source = %Source::Frontend, timestamp, "cached object still valid");
            return;
        }
        let key = Source::Frontend.store_key();
        match fetch_payload::<FrontendConfig>(self.store.as_ref(), key, timestamp) {
            Ok((config, window, object)) => {
                info!(
                    source = %Source::Frontend,
                    valid_from = window.start().unwrap_or_default(),
                    valid_until = window.end().unwrap_or_default(),
                    etag = metadata_or_dash(&object, "ETag"),
                    last_modified = metadata_or_dash(&object, "Last-Modified"),
                    disabled = config.disabled_channels().len(),
                    "using front-end configuration"
                );
                self.frontend_map = config.to_status_map(self.topology.total_channels());
                self.frontend.store(config, window);
            }
            Err(err) => {
                error!(
                    source = %Source::Frontend,
                    timestamp,
                    error = %err,
                    "fetch failed, keeping previous data"
                );
                self.frontend.mark_failed();
            }
        }
    }

    fn refresh_pad_flags(&mut self, timestamp: Timestamp) {
        if !self.pad_flags.needs_refresh(timestamp) {
            debug!(source = %Source::PadFlags, timestamp, "cached object still valid");
            return;
        }
        let key = Source::PadFlags.store_key();
        match fetch_payload::<PadFlagPayload>(self.store.as_ref(), key, timestamp) {
            Ok((payload, window, _object)) => {
                let total = self.topology.total_channels();
                if payload.len() != total {
                    error!(
                        source = %Source::PadFlags,
                        timestamp,
                        expected = total,
                        got = payload.len(),
                        "payload channel count does not match topology, keeping previous data"
                    );
                    self.pad_flags.mark_failed();
                    return;
                }
                self.pad_flags_map =
                    extract_masked(&payload.to_flag_map(), self.config.exclusion_mask);
                info!(
                    source = %Source::PadFlags,
                    valid_from = window.start().unwrap_or_default(),
                    valid_until = window.end().unwrap_or_default(),
                    excluded = self.pad_flags_map.count_set(),
                    "updated pad status flags"
                );
                self.pad_flags.store(payload, window);
            }
            Err(err) => {
                error!(
                    source = %Source::PadFlags,
                    timestamp,
                    error = %err,
                    "fetch failed, keeping previous data"
                );
                self.pad_flags.mark_failed();
            }
        }
    }

    fn recompose(&mut self) {
        let mut selected: Vec<&StatusMap> = Vec::with_capacity(Source::ALL.len());
        if self.config.enabled.contains(SourceSet::FRONTEND) {
            selected.push(&self.frontend_map);
        }
        if self.config.enabled.contains(SourceSet::PAD_FLAGS) {
            selected.push(&self.pad_flags_map);
        }
        let sources = selected.len();
        self.derived = compose(selected, self.topology.total_channels());
        debug!(
            sources,
            excluded = self.derived.count_set(),
            "recomposed derived map"
        );
    }
}

fn metadata_or_dash<'a>(object: &'a StoredObject, field: &str) -> &'a str {
    object
        .metadata
        .get(field)
        .map(String::as_str)
        .unwrap_or("-")
}

/// Fetch an object and run it through metadata and payload decoding.
///
/// Any of the three steps failing is one recoverable fetch failure to the
/// caller; in particular missing validity metadata is handled exactly like
/// an absent object.
fn fetch_payload<P: ConditionsPayload>(
    store: &dyn ConditionsStore,
    key: &str,
    timestamp: Timestamp,
) -> Result<(P, ValidityWindow, StoredObject), StoreError> {
    let object = store.fetch(key, timestamp)?;
    let window = object.validity()?;
    let payload = P::decode(&object.payload)?;
    Ok((payload, window, object))
}
