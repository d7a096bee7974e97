//! Log output for the CLI.
//!
//! Logs go to stderr so stdout carries only the JSON response. `RUST_LOG`
//! overrides the level chosen by `-v`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events are shown by default.
const TARGETS: [&str; 2] = ["slot_engine", "slotbook"];

fn default_directives(level: Level) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. `verbose` lowers the default level from
/// WARN to DEBUG.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))?;

    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}
