//! File-system helpers for the mirroring engine.
use anyhow::{Context as _, Result};
use std::path::Path;

use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::resources::freshness::{self, Freshness};
use crate::resources::{TransferOutcome, TransferStats};

/// Collaborators shared by every copy in one mirroring pass.
#[derive(Clone, Copy)]
pub struct CopyContext<'a> {
    /// Filesystem the copy reads from and writes to.
    pub fs: &'a dyn FileSystemOps,
    /// Sink for per-file decisions.
    pub log: &'a dyn Log,
    /// When `false`, decisions are made and logged but nothing is written.
    pub perform: bool,
}

impl std::fmt::Debug for CopyContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyContext")
            .field("fs", &self.fs)
            .field("log", &"<dyn Log>")
            .field("perform", &self.perform)
            .finish()
    }
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(ctx: &CopyContext<'_>, path: &Path) -> Result<()> {
    if !ctx.perform {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        ctx.fs
            .create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Copy the file `from` over `to` unless `to` is already at least as new.
///
/// The destination's parent is created when a copy is needed.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be read or the copy fails.
pub fn copy_if_newer(ctx: &CopyContext<'_>, from: &Path, to: &Path) -> Result<TransferOutcome> {
    let verdict = freshness::compare(ctx.fs, from, to)
        .with_context(|| format!("comparing {} with {}", from.display(), to.display()))?;
    match verdict {
        Freshness::SourceNewer => {
            ctx.log
                .debug(&format!("copy {} -> {}", from.display(), to.display()));
            if ctx.perform {
                ensure_parent_dir(ctx, to)?;
                ctx.fs.copy_file(from, to).with_context(|| {
                    format!("copying {} to {}", from.display(), to.display())
                })?;
            }
            Ok(TransferOutcome::Copied)
        }
        Freshness::Equal => {
            ctx.log.debug(&format!("up to date: {}", to.display()));
            Ok(TransferOutcome::UpToDate)
        }
        Freshness::StoreNewer => {
            ctx.log
                .debug(&format!("keeping newer copy: {}", to.display()));
            Ok(TransferOutcome::KeptNewer)
        }
    }
}

/// Recursively copy the directory tree `from` into `to`, pruning files that
/// are already up to date.
///
/// Directories are always descended into so that stale files deep inside an
/// otherwise current tree are still found.  A file is skipped when its copy
/// exists and is not older.  Entries already in `to` that have no
/// counterpart in `from` are left untouched.  Entries that are neither files
/// nor directories are skipped with a warning.
///
/// Symlinks within the tree are *followed*: [`FileSystemOps::is_dir`] follows
/// symlinks, so directory symlinks are recursed into and their contents
/// materialised.
///
/// # Errors
///
/// Returns an error on the first directory that cannot be created or read,
/// or the first file that cannot be compared or copied.
pub fn copy_tree_pruned(
    ctx: &CopyContext<'_>,
    from: &Path,
    to: &Path,
    stats: &mut TransferStats,
) -> Result<()> {
    if ctx.perform {
        ctx.fs
            .create_dir_all(to)
            .with_context(|| format!("creating directory {}", to.display()))?;
    }
    let entries = ctx
        .fs
        .read_dir(from)
        .with_context(|| format!("reading directory {}", from.display()))?;
    for entry in entries {
        let Some(name) = entry.file_name() else {
            continue;
        };
        let target = to.join(name);
        if ctx.fs.is_dir(&entry) {
            copy_tree_pruned(ctx, &entry, &target, stats)?;
        } else if ctx.fs.is_file(&entry) {
            stats.record(copy_if_newer(ctx, &entry, &target)?);
        } else {
            ctx.log
                .warn(&format!("skipping unrecognized entry: {}", entry.display()));
        }
    }
    Ok(())
}
