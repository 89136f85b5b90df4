//! Logging setup for binaries and integration tests.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the embedder's choice. This helper wires up a console subscriber with
//! an `RUST_LOG` override, defaulting to `info`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Initialize console logging.
///
/// Returns an error if a global subscriber is already installed, so tests
/// can call this unconditionally.
pub fn init() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
