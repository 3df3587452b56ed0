//! Top-level subcommand orchestration.
pub mod backup;
pub mod init;
pub mod remove_stored;
pub mod restore;
pub mod version;

use anyhow::{Context as _, Result};
use std::sync::Arc;

use crate::cli::StoreOpts;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::store::{BackupReport, Store};

/// Open the store named on the command line, announcing it and, for a dry
/// run, saying so.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or is malformed.
pub fn open_store(opts: &StoreOpts, command: &str, log: &Arc<dyn Log>) -> Result<Store> {
    log.info(&format!("Store: \"{}\"", opts.path.display()));
    if opts.dry_run {
        log.dry_run(&format!("This is a dry run of {command}."));
    }

    log.stage("Loading manifest");
    let fs: Arc<dyn FileSystemOps> = Arc::new(SystemFileSystemOps);
    let store = Store::open(&opts.path, fs, Arc::clone(log), !opts.dry_run)
        .with_context(|| format!("loading store {}", opts.path.display()))?;
    log.debug(&format!(
        "{} manifest entries",
        store.backup_paths().count()
    ));
    Ok(store)
}

/// Print the run summary and the failure list, and bail if any path failed.
///
/// # Errors
///
/// Returns an error if one or more paths recorded a failure.
pub fn finish(report: &BackupReport, dry_run: bool, log: &dyn Log) -> Result<()> {
    log.info(&report.stats.summary(dry_run));
    if report.is_success() {
        return Ok(());
    }

    log.error("These are the failures:");
    for failure in &report.failures {
        log.failure(failure);
    }
    let count = report.failures.len();
    anyhow::bail!("{count} path(s) failed");
}
