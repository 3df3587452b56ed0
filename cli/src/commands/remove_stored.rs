//! Remove-stored command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::StoreOpts;
use crate::logging::Log;

/// Run the remove-stored command: delete the stored copy of every path the
/// manifest selects.
///
/// Removal is best effort; individual failures are logged, not returned.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded.
pub fn run(opts: &StoreOpts, log: &Arc<dyn Log>) -> Result<()> {
    let store = super::open_store(opts, "remove-stored", log)?;

    log.stage("Removing stored copies");
    let removed = store.remove_stored_all();
    let verb = if opts.dry_run { "would remove" } else { "removed" };
    log.info(&format!("{removed} stored path(s) {verb}"));
    Ok(())
}
