//! Conditions-store collaborator contract.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::cache::ValidityWindow;
use crate::Timestamp;

/// Metadata key carrying the start of an object's validity interval.
pub const META_VALID_FROM: &str = "Valid-From";

/// Metadata key carrying the end of an object's validity interval.
pub const META_VALID_UNTIL: &str = "Valid-Until";

/// Raw object as returned by the conditions store: payload bytes plus the
/// string metadata the store attaches to every object.
///
/// The validity bounds travel in the metadata map under
/// [`META_VALID_FROM`] / [`META_VALID_UNTIL`], following the upstream
/// conditions-database convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    /// Encoded payload
    pub payload: Vec<u8>,
    /// Object metadata as key/value strings
    pub metadata: BTreeMap<String, String>,
}

impl StoredObject {
    /// Object with payload bytes and no metadata.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            metadata: BTreeMap::new(),
        }
    }

    /// Object with payload bytes and validity bounds already in place.
    pub fn with_validity(payload: Vec<u8>, start: Timestamp, end: Timestamp) -> Self {
        let mut object = Self::new(payload);
        object
            .metadata
            .insert(META_VALID_FROM.to_string(), start.to_string());
        object
            .metadata
            .insert(META_VALID_UNTIL.to_string(), end.to_string());
        object
    }

    /// Parse the validity window out of the metadata.
    ///
    /// A missing or unparseable bound is [`StoreError::MetadataMissing`];
    /// callers must treat that exactly like [`StoreError::NotFound`].
    pub fn validity(&self) -> Result<ValidityWindow, StoreError> {
        let start = self.metadata_timestamp(META_VALID_FROM)?;
        let end = self.metadata_timestamp(META_VALID_UNTIL)?;
        Ok(ValidityWindow::new(start, end))
    }

    fn metadata_timestamp(&self, field: &'static str) -> Result<Timestamp, StoreError> {
        self.metadata
            .get(field)
            .and_then(|value| value.parse().ok())
            .ok_or(StoreError::MetadataMissing { field })
    }
}

/// Errors of a conditions-store fetch, all recoverable for the caller:
/// log, keep the stale payload, retry on the next load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No object covers the requested timestamp
    #[error("no object for {key} at timestamp {timestamp}")]
    NotFound { key: String, timestamp: Timestamp },

    /// Payload present but malformed
    #[error("payload decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Required metadata field absent or unparseable
    #[error("required metadata field {field} missing or malformed")]
    MetadataMissing { field: &'static str },
}

/// Payload codec contract violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Bytes do not decode into the payload type
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Payload encoded with a format version this build does not read
    #[error("unsupported payload format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Remote conditions store, consumed as a black box.
///
/// Implementations resolve `key` at `timestamp` to the object whose
/// validity interval covers it. Transport and wire format are entirely
/// theirs; this crate only sees [`StoredObject`]s.
pub trait ConditionsStore: Send + Sync {
    /// Fetch the object stored under `key` that covers `timestamp`.
    fn fetch(&self, key: &str, timestamp: Timestamp) -> Result<StoredObject, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_parses_bounds_from_metadata() {
        let object = StoredObject::with_validity(vec![], 100, 200);
        assert_eq!(object.validity(), Ok(ValidityWindow::new(100, 200)));
    }

    #[test]
    fn validity_reports_missing_bound() {
        let mut object = StoredObject::new(vec![]);
        object
            .metadata
            .insert(META_VALID_FROM.to_string(), "100".to_string());
        assert_eq!(
            object.validity(),
            Err(StoreError::MetadataMissing {
                field: META_VALID_UNTIL
            })
        );
    }

    #[test]
    fn validity_reports_unparseable_bound() {
        let mut object = StoredObject::with_validity(vec![], 100, 200);
        object
            .metadata
            .insert(META_VALID_FROM.to_string(), "not-a-number".to_string());
        assert_eq!(
            object.validity(),
            Err(StoreError::MetadataMissing {
                field: META_VALID_FROM
            })
        );
    }
}
