//! Tracing subscriber setup for the `credvault` binary.
//!
//! Library code only emits `tracing` events; the binary decides where
//! they go.  Events never carry usernames, passwords or key material.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set.  Otherwise only warnings are shown, or
/// debug output for this crate when `verbose` is set.
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "credvault=debug,warn"
    } else {
        "credvault=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
