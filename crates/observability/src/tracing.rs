//! Tracing/logging initialization.
//!
//! Output defaults to JSON lines for log shipping; set `LOG_FORMAT=pretty`
//! for human-readable output when running the service interactively.
//! Verbosity is controlled with the usual `RUST_LOG` filter syntax.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match std::env::var("LOG_FORMAT").ok().as_deref() {
        Some("pretty") => {
            let _ = builder.pretty().try_init();
        }
        _ => {
            let _ = builder.json().try_init();
        }
    }
}
