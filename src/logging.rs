// src/logging.rs
// =============================================================================
// Diagnostic logging with `tracing`.
//
// Diagnostics (fetch failures, sink errors, task progress) go through the
// tracing macros and are printed to stderr. The level comes from RUST_LOG
// when it is set; otherwise "warn", or "info" for our own crate with
// --verbose.
//
//   RUST_LOG=link_spider=debug link-spider example.com
//   RUST_LOG=link_spider=trace,reqwest=debug ...
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,link_spider=info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init only fails if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
