//! Diagnostics setup. Step log lines go to stdout; everything here goes to stderr.
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Filter directives for diagnostics, e.g. `TEST_STEPS_LOG=debug`.
pub const LOG_ENV: &str = "TEST_STEPS_LOG";

pub fn init(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
