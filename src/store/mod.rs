//! Remote conditions-store collaborator: contract, payload codec and an
//! in-process implementation.
//!
//! The store hands out raw [`StoredObject`]s; typed payloads go through the
//! explicit versioned [`ConditionsPayload`] codec. How objects travel to
//! this process is the store implementation's business.

mod memory;
mod payload;
mod types;

pub use memory::MemoryStore;
pub use payload::{ConditionsPayload, FrontendConfig, PadFlagPayload};
pub use types::{
    ConditionsStore, DecodeError, StoreError, StoredObject, META_VALID_FROM, META_VALID_UNTIL,
};
