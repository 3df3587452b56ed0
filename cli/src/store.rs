//! The store orchestrator: manifest in, mirrored tree and failure list out.
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::config::manifest::{ManifestNode, ResolvedPaths};
use crate::error::SparseStoreError;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::resources::TransferStats;
use crate::resources::backup_path::MirrorEngine;
use crate::resources::error::BackupFailure;

/// Outcome of a backup or restore run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// Failure records, in resolution order.
    pub failures: Vec<BackupFailure>,
    /// File counters for the whole run.
    pub stats: TransferStats,
}

impl BackupReport {
    /// `true` when no path failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A store on disk together with its parsed manifest.
///
/// The manifest is parsed once, when the store is opened; a malformed
/// manifest therefore fails [`open`](Self::open) before any path is touched.
pub struct Store {
    config: Config,
    manifest: ManifestNode,
    fs: Arc<dyn FileSystemOps>,
    log: Arc<dyn Log>,
    perform: bool,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("manifest", &self.manifest)
            .field("fs", &self.fs)
            .field("log", &"<dyn Log>")
            .field("perform", &self.perform)
            .finish()
    }
}

impl Store {
    /// Open the store rooted at `root` and parse its manifest.
    ///
    /// With `perform` set to `false` runs are dry: decisions and log lines are
    /// identical, but the filesystem is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `sparse_store.yaml` cannot be read, is not YAML,
    /// lacks a `backup` section, or violates the manifest format.
    pub fn open(
        root: &Path,
        fs: Arc<dyn FileSystemOps>,
        log: Arc<dyn Log>,
        perform: bool,
    ) -> Result<Self, SparseStoreError> {
        let config = Config::new(root);
        let manifest = config.manifest()?;
        Ok(Self::with_manifest(config, manifest, fs, log, perform))
    }

    /// Build a store from an already-parsed manifest.
    #[must_use]
    pub fn with_manifest(
        config: Config,
        manifest: ManifestNode,
        fs: Arc<dyn FileSystemOps>,
        log: Arc<dyn Log>,
        perform: bool,
    ) -> Self {
        Self {
            config,
            manifest,
            fs,
            log,
            perform,
        }
    }

    /// Store layout.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The parsed manifest.
    #[must_use]
    pub const fn manifest(&self) -> &ManifestNode {
        &self.manifest
    }

    /// Every source path selected by the manifest, in declaration order.
    ///
    /// Relative entries resolve against the store root; absolute entries
    /// stand on their own.  Duplicates are kept.
    #[must_use]
    pub fn backup_paths(&self) -> ResolvedPaths<'_> {
        self.manifest.resolve(&self.config.root)
    }

    /// Mirror every selected path into the store.
    ///
    /// Individual path failures are collected, never raised.
    #[must_use]
    pub fn backup(&self) -> BackupReport {
        let mut engine = self.engine();
        let failures = self
            .backup_paths()
            .filter_map(|path| engine.mirror_one(&path))
            .collect();
        BackupReport {
            failures,
            stats: engine.stats(),
        }
    }

    /// Copy every selected path back from the store.
    #[must_use]
    pub fn restore(&self) -> BackupReport {
        let mut engine = self.engine();
        let failures = self
            .backup_paths()
            .filter_map(|path| engine.restore_one(&path))
            .collect();
        BackupReport {
            failures,
            stats: engine.stats(),
        }
    }

    /// Delete the stored copy of every selected path.
    ///
    /// Best effort: failures are logged only.  Returns the number of stored
    /// paths removed.
    #[must_use]
    pub fn remove_stored_all(&self) -> usize {
        let engine = self.engine();
        self.backup_paths()
            .filter(|path| engine.remove_stored(path))
            .count()
    }

    fn engine(&self) -> MirrorEngine {
        MirrorEngine::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.log),
            &self.config.backup_path(),
            self.perform,
        )
    }
}
