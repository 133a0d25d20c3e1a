//! Logging setup for binaries and tests embedding the interpreter.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the host's choice. [`init_logging`] is a convenience for hosts that
//! want the default console output.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a console subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; an already-installed global subscriber is
/// left in place.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }
    });
}
