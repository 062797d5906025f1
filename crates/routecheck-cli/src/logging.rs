//! Diagnostic logging to stderr

use crate::config::Verbosity;
use crate::error::{CliError, CliResult};
use std::io;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set, otherwise from the verbosity level.
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Install the global `fmt` subscriber. Suite output stays on stdout.
pub fn init(verbosity: Verbosity) -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_target(verbosity.is_verbose())
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| CliError::runtime(format!("failed to install logger: {e}")))
}
