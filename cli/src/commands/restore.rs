//! Restore command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::StoreOpts;
use crate::logging::Log;

/// Run the restore command: copy stored files back to their source paths.
///
/// A source file newer than its stored copy is never overwritten.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or any path failed to
/// restore.
pub fn run(opts: &StoreOpts, log: &Arc<dyn Log>) -> Result<()> {
    let store = super::open_store(opts, "restore", log)?;

    log.stage("Commencing restore...");
    let report = store.restore();

    super::finish(&report, opts.dry_run, log.as_ref())
}
