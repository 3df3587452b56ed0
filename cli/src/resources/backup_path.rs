//! Per-path mirroring between source locations and the store.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::BackupFailure;
use super::helpers::fs::{CopyContext, copy_if_newer, copy_tree_pruned, ensure_parent_dir};
use super::TransferStats;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::paths::storage_path;

/// Decides, per resolved source path, whether to copy, skip or report a
/// failure, and carries out the copy.
///
/// Individual path failures are returned as [`BackupFailure`] records and
/// never stop the caller from moving on to the next path.
pub struct MirrorEngine {
    fs: Arc<dyn FileSystemOps>,
    log: Arc<dyn Log>,
    backup_root: PathBuf,
    perform: bool,
    stats: TransferStats,
}

impl std::fmt::Debug for MirrorEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorEngine")
            .field("fs", &self.fs)
            .field("log", &"<dyn Log>")
            .field("backup_root", &self.backup_root)
            .field("perform", &self.perform)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Which way a transfer goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backup,
    Restore,
}

impl MirrorEngine {
    /// Create an engine that mirrors into `backup_root`.
    ///
    /// With `perform` set to `false` every decision is made and logged exactly
    /// as in a real run, but the filesystem is never modified.
    #[must_use]
    pub fn new(
        fs: Arc<dyn FileSystemOps>,
        log: Arc<dyn Log>,
        backup_root: &Path,
        perform: bool,
    ) -> Self {
        Self {
            fs,
            log,
            backup_root: backup_root.to_path_buf(),
            perform,
            stats: TransferStats::new(),
        }
    }

    /// Root of the mirrored tree.
    #[must_use]
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// File counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> TransferStats {
        self.stats
    }

    /// Mirror `source` into the store.
    ///
    /// - a missing source yields [`BackupFailure::PathNotFound`];
    /// - a directory is copied recursively, skipping files whose stored copy
    ///   is already at least as new;
    /// - a file is copied only when the source is newer than its stored copy
    ///   (or there is none), so a newer stored copy is never overwritten;
    /// - anything else yields [`BackupFailure::UnrecognizedPathType`].
    pub fn mirror_one(&mut self, source: &Path) -> Option<BackupFailure> {
        let stored = match self.stored_path(source) {
            Ok(stored) => stored,
            Err(failure) => return Some(failure),
        };
        self.transfer(source, &stored, Direction::Backup)
    }

    /// Copy the stored counterpart of `source` back to `source`.
    ///
    /// The inverse of [`mirror_one`](Self::mirror_one) with the same pruning
    /// and freshness rules; a source file newer than its stored copy is
    /// never overwritten.  A missing stored copy yields
    /// [`BackupFailure::PathNotFound`] for the stored path.
    pub fn restore_one(&mut self, source: &Path) -> Option<BackupFailure> {
        let stored = match self.stored_path(source) {
            Ok(stored) => stored,
            Err(failure) => return Some(failure),
        };
        self.transfer(&stored, source, Direction::Restore)
    }

    /// Delete the stored counterpart of `source`, file or whole directory.
    ///
    /// Absent copies are logged and ignored.  Failures are logged but not
    /// returned.  Returns `true` if something was (or, in a dry run, would
    /// have been) removed.
    pub fn remove_stored(&self, source: &Path) -> bool {
        let stored = match self.stored_path(source) {
            Ok(stored) => stored,
            Err(failure) => {
                self.log.warn(&failure.to_string());
                return false;
            }
        };
        if !self.fs.exists(&stored) {
            self.log
                .debug(&format!("nothing stored for {}", source.display()));
            return false;
        }
        self.log.debug(&format!("remove {}", stored.display()));
        if !self.perform {
            return true;
        }
        let result = if self.fs.is_dir(&stored) {
            self.fs.remove_dir_all(&stored)
        } else {
            self.fs.remove_file(&stored)
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                self.log
                    .error(&format!("failed to remove {}: {e}", stored.display()));
                false
            }
        }
    }

    fn stored_path(&self, source: &Path) -> Result<PathBuf, BackupFailure> {
        storage_path(&self.backup_root, source).map_err(|e| BackupFailure::InvalidStorePath {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn transfer(&mut self, from: &Path, to: &Path, direction: Direction) -> Option<BackupFailure> {
        if !self.fs.exists(from) {
            let what = match direction {
                Direction::Backup => "path not found",
                Direction::Restore => "no stored copy",
            };
            self.log.warn(&format!("{what}: {}", from.display()));
            return Some(BackupFailure::PathNotFound {
                path: from.to_path_buf(),
            });
        }

        let ctx = CopyContext {
            fs: self.fs.as_ref(),
            log: self.log.as_ref(),
            perform: self.perform,
        };

        if self.fs.is_dir(from) {
            self.log.debug(&format!(
                "copy directory {} -> {}",
                from.display(),
                to.display()
            ));
            let result = ensure_parent_dir(&ctx, to)
                .and_then(|()| copy_tree_pruned(&ctx, from, to, &mut self.stats));
            return result.err().map(|e| {
                self.log.error(&format!(
                    "failed to copy directory {}: {e:#}",
                    from.display()
                ));
                BackupFailure::DirectoryCopy {
                    path: from.to_path_buf(),
                    stored: to.to_path_buf(),
                    reason: format!("{e:#}"),
                }
            });
        }

        if self.fs.is_file(from) {
            return match copy_if_newer(&ctx, from, to) {
                Ok(outcome) => {
                    self.stats.record(outcome);
                    None
                }
                Err(e) => {
                    self.log
                        .error(&format!("failed to copy file {}: {e:#}", from.display()));
                    Some(BackupFailure::FileCopy {
                        path: from.to_path_buf(),
                        stored: to.to_path_buf(),
                        reason: format!("{e:#}"),
                    })
                }
            };
        }

        self.log
            .error(&format!("unrecognized path type: {}", from.display()));
        Some(BackupFailure::UnrecognizedPathType {
            path: from.to_path_buf(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{MemoryLog, NullLog};
    use crate::operations::MockFileSystemOps;

    const BACKUP: &str = "/store/backup";

    fn engine(fs: &Arc<MockFileSystemOps>, perform: bool) -> MirrorEngine {
        MirrorEngine::new(
            Arc::clone(fs) as Arc<dyn FileSystemOps>,
            Arc::new(NullLog),
            Path::new(BACKUP),
            perform,
        )
    }

    fn stored(source: &str) -> PathBuf {
        storage_path(Path::new(BACKUP), Path::new(source)).unwrap()
    }

    // -----------------------------------------------------------------------
    // mirror_one: files
    // -----------------------------------------------------------------------

    #[test]
    fn new_file_is_copied_into_store() {
        let fs = Arc::new(MockFileSystemOps::new().with_file("/home/me/notes", 7));
        let mut engine = engine(&fs, true);
        assert_eq!(engine.mirror_one(Path::new("/home/me/notes")), None);
        assert_eq!(
            fs.modified_at(&stored("/home/me/notes")),
            Some(MockFileSystemOps::at(7))
        );
        assert_eq!(engine.stats().copied, 1);
    }

    #[test]
    fn second_run_copies_nothing() {
        let fs = Arc::new(MockFileSystemOps::new().with_file("/home/me/notes", 7));
        engine(&fs, true).mirror_one(Path::new("/home/me/notes"));
        let mut second = engine(&fs, true);
        assert_eq!(second.mirror_one(Path::new("/home/me/notes")), None);
        assert_eq!(fs.copy_count(), 1);
        assert_eq!(second.stats().up_to_date, 1);
    }

    #[test]
    fn newer_stored_file_is_not_overwritten() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/home/me/notes", 7)
                .with_file(stored("/home/me/notes"), 99),
        );
        let mut engine = engine(&fs, true);
        assert_eq!(engine.mirror_one(Path::new("/home/me/notes")), None);
        assert_eq!(
            fs.modified_at(&stored("/home/me/notes")),
            Some(MockFileSystemOps::at(99))
        );
        assert_eq!(engine.stats().kept_newer, 1);
    }

    #[test]
    fn failed_file_copy_is_recorded() {
        let target = stored("/home/me/notes");
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/home/me/notes", 7)
                .fail_copy_to(target.clone()),
        );
        let failure = engine(&fs, true)
            .mirror_one(Path::new("/home/me/notes"))
            .unwrap();
        assert!(matches!(
            failure,
            BackupFailure::FileCopy { ref path, ref stored, .. }
                if path == Path::new("/home/me/notes") && *stored == target
        ));
    }

    // -----------------------------------------------------------------------
    // mirror_one: other path kinds
    // -----------------------------------------------------------------------

    #[test]
    fn missing_source_is_path_not_found() {
        let fs = Arc::new(MockFileSystemOps::new());
        let log = Arc::new(MemoryLog::new());
        let mut engine = MirrorEngine::new(
            Arc::clone(&fs) as Arc<dyn FileSystemOps>,
            Arc::clone(&log) as Arc<dyn Log>,
            Path::new(BACKUP),
            true,
        );
        assert_eq!(
            engine.mirror_one(Path::new("/gone")),
            Some(BackupFailure::PathNotFound {
                path: PathBuf::from("/gone")
            })
        );
        assert_eq!(log.messages("warn"), ["path not found: /gone"]);
    }

    #[test]
    fn special_file_is_unrecognized() {
        let fs = Arc::new(MockFileSystemOps::new().with_special("/dev/thing"));
        assert_eq!(
            engine(&fs, true).mirror_one(Path::new("/dev/thing")),
            Some(BackupFailure::UnrecognizedPathType {
                path: PathBuf::from("/dev/thing")
            })
        );
    }

    #[test]
    fn parent_component_is_invalid_store_path() {
        let fs = Arc::new(MockFileSystemOps::new().with_file("/a/b", 1));
        let failure = engine(&fs, true)
            .mirror_one(Path::new("/a/x/../b"))
            .unwrap();
        assert!(matches!(failure, BackupFailure::InvalidStorePath { .. }));
        assert_eq!(fs.copy_count(), 0);
    }

    #[test]
    fn directory_is_copied_with_pruning() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/home/me/docs/current", 5)
                .with_file("/home/me/docs/sub/stale", 9)
                .with_file(stored("/home/me/docs/current"), 5)
                .with_file(stored("/home/me/docs/sub/stale"), 3),
        );
        let mut engine = engine(&fs, true);
        assert_eq!(engine.mirror_one(Path::new("/home/me/docs")), None);
        assert_eq!(fs.copy_count(), 1);
        assert_eq!(
            fs.modified_at(&stored("/home/me/docs/sub/stale")),
            Some(MockFileSystemOps::at(9))
        );
        assert_eq!(engine.stats().up_to_date, 1);
    }

    #[test]
    fn unreadable_directory_is_directory_copy_failure() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/home/me/docs/private/key", 1)
                .deny_read("/home/me/docs/private"),
        );
        let failure = engine(&fs, true)
            .mirror_one(Path::new("/home/me/docs"))
            .unwrap();
        assert!(matches!(
            failure,
            BackupFailure::DirectoryCopy { ref reason, .. } if reason.contains("permission denied")
        ));
    }

    #[test]
    fn dry_run_reports_but_does_not_copy() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/home/me/notes", 7)
                .with_file("/home/me/docs/a", 7),
        );
        let mut engine = engine(&fs, false);
        assert_eq!(engine.mirror_one(Path::new("/home/me/notes")), None);
        assert_eq!(engine.mirror_one(Path::new("/home/me/docs")), None);
        assert_eq!(engine.stats().copied, 2);
        assert_eq!(fs.copy_count(), 0);
        assert!(!fs.exists(Path::new(BACKUP)));
    }

    // -----------------------------------------------------------------------
    // restore_one
    // -----------------------------------------------------------------------

    #[test]
    fn restore_copies_stored_file_back() {
        let fs = Arc::new(MockFileSystemOps::new().with_file(stored("/home/me/notes"), 4));
        let mut engine = engine(&fs, true);
        assert_eq!(engine.restore_one(Path::new("/home/me/notes")), None);
        assert_eq!(
            fs.modified_at(Path::new("/home/me/notes")),
            Some(MockFileSystemOps::at(4))
        );
    }

    #[test]
    fn restore_never_overwrites_newer_source() {
        let fs = Arc::new(
            MockFileSystemOps::new()
                .with_file("/home/me/notes", 50)
                .with_file(stored("/home/me/notes"), 4),
        );
        let mut engine = engine(&fs, true);
        assert_eq!(engine.restore_one(Path::new("/home/me/notes")), None);
        assert_eq!(
            fs.modified_at(Path::new("/home/me/notes")),
            Some(MockFileSystemOps::at(50))
        );
        assert_eq!(engine.stats().kept_newer, 1);
    }

    #[test]
    fn restore_without_stored_copy_reports_stored_path() {
        let fs = Arc::new(MockFileSystemOps::new());
        assert_eq!(
            engine(&fs, true).restore_one(Path::new("/home/me/notes")),
            Some(BackupFailure::PathNotFound {
                path: stored("/home/me/notes")
            })
        );
    }

    // -----------------------------------------------------------------------
    // remove_stored
    // -----------------------------------------------------------------------

    #[test]
    fn remove_stored_deletes_directory_copy() {
        let fs = Arc::new(MockFileSystemOps::new().with_file(stored("/home/me/docs/a"), 1));
        assert!(engine(&fs, true).remove_stored(Path::new("/home/me/docs")));
        assert!(!fs.exists(&stored("/home/me/docs")));
    }

    #[test]
    fn remove_stored_deletes_file_copy() {
        let fs = Arc::new(MockFileSystemOps::new().with_file(stored("/home/me/notes"), 1));
        assert!(engine(&fs, true).remove_stored(Path::new("/home/me/notes")));
        assert!(!fs.exists(&stored("/home/me/notes")));
    }

    #[test]
    fn remove_stored_absent_copy_is_noop() {
        let fs = Arc::new(MockFileSystemOps::new());
        assert!(!engine(&fs, true).remove_stored(Path::new("/home/me/notes")));
    }

    #[test]
    fn remove_stored_dry_run_keeps_copy() {
        let fs = Arc::new(MockFileSystemOps::new().with_file(stored("/home/me/notes"), 1));
        assert!(engine(&fs, false).remove_stored(Path::new("/home/me/notes")));
        assert!(fs.exists(&stored("/home/me/notes")));
    }
}
