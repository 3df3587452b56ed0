//! Command: print version information.
use crate::logging::Log;

/// Version string baked in at build time, or the crate version for local builds.
#[must_use]
pub fn version() -> &'static str {
    option_env!("SPARSE_STORE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the sparse-store version.
pub fn run(log: &dyn Log) {
    log.info(&format!("sparse-store {}", version()));
}
