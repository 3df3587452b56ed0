//! Backup command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::StoreOpts;
use crate::logging::Log;

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or any path failed to
/// mirror.
pub fn run(opts: &StoreOpts, log: &Arc<dyn Log>) -> Result<()> {
    let store = super::open_store(opts, "backup", log)?;

    log.stage("Commencing backup...");
    let report = store.backup();

    super::finish(&report, opts.dry_run, log.as_ref())
}
