// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed store plus a source tree next to it,
// so each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use filetime::FileTime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use sparse_store::config::{BACKUP_DIR_NAME, CONFIG_FILE_NAME};
use sparse_store::logging::{Log, NullLog};
use sparse_store::operations::{FileSystemOps, SystemFileSystemOps};
use sparse_store::paths::storage_path;
use sparse_store::store::Store;

/// Set the modification time of `path` to `secs` seconds after the epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let time = FileTime::from_system_time(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
    filetime::set_file_mtime(path, time).expect("set modified time");
}

/// Modification time of `path` in whole seconds after the epoch.
pub fn mtime(path: &Path) -> u64 {
    std::fs::metadata(path)
        .expect("stat")
        .modified()
        .expect("modified time")
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("after epoch")
        .as_secs()
}

/// An isolated store and source tree backed by a [`tempfile::TempDir`].
///
/// Layout:
/// - `<tmp>/store/sparse_store.yaml`
/// - `<tmp>/store/backup/`
/// - `<tmp>/source/`: files the manifest points at
pub struct StoreFixture {
    /// Temporary directory holding both trees; deleted on drop.
    pub tmp: tempfile::TempDir,
}

impl StoreFixture {
    /// Create an empty store (manifest `backup: []`) and an empty source tree.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("store").join(BACKUP_DIR_NAME))
            .expect("create store");
        std::fs::create_dir_all(tmp.path().join("source")).expect("create source");
        let fixture = Self { tmp };
        fixture.write_manifest("backup: []\n");
        fixture
    }

    /// Store root.
    pub fn store_root(&self) -> PathBuf {
        self.tmp.path().join("store")
    }

    /// Source tree root.
    pub fn source_root(&self) -> PathBuf {
        self.tmp.path().join("source")
    }

    /// Absolute path of `rel` inside the source tree.
    pub fn source(&self, rel: &str) -> PathBuf {
        self.source_root().join(rel)
    }

    /// Where the stored copy of source path `rel` lives.
    pub fn stored(&self, rel: &str) -> PathBuf {
        storage_path(&self.store_root().join(BACKUP_DIR_NAME), &self.source(rel))
            .expect("encode source path")
    }

    /// Write the manifest.  `{source}` is replaced by the source tree root.
    pub fn write_manifest(&self, manifest: &str) {
        let source = self.source_root().display().to_string().replace('\\', "/");
        std::fs::write(
            self.store_root().join(CONFIG_FILE_NAME),
            manifest.replace("{source}", &source),
        )
        .expect("write manifest");
    }

    /// Write a source file (creating parents) with modification time `secs`.
    pub fn write_source(&self, rel: &str, content: &str, secs: u64) -> PathBuf {
        let path = self.source(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
        set_mtime(&path, secs);
        path
    }

    /// Mark source file `rel` read-only, or writable again.
    pub fn set_read_only(&self, rel: &str, read_only: bool) {
        let path = self.source(rel);
        let mut perms = std::fs::metadata(&path).expect("stat").permissions();
        perms.set_readonly(read_only);
        std::fs::set_permissions(&path, perms).expect("set permissions");
    }

    /// Open the store against the real filesystem with a silent logger.
    pub fn open(&self, perform: bool) -> Store {
        let fs: Arc<dyn FileSystemOps> = Arc::new(SystemFileSystemOps);
        let log: Arc<dyn Log> = Arc::new(NullLog);
        Store::open(&self.store_root(), fs, log, perform).expect("open store")
    }
}

/// Fluent builder for [`StoreFixture`].
pub struct StoreFixtureBuilder {
    fixture: StoreFixture,
}

impl StoreFixtureBuilder {
    /// Begin building a new fixture.
    pub fn new() -> Self {
        Self {
            fixture: StoreFixture::new(),
        }
    }

    /// Use `manifest` as `sparse_store.yaml` (see [`StoreFixture::write_manifest`]).
    pub fn with_manifest(self, manifest: &str) -> Self {
        self.fixture.write_manifest(manifest);
        self
    }

    /// Add a source file with the given content and modification time.
    pub fn with_source_file(self, rel: &str, content: &str, secs: u64) -> Self {
        self.fixture.write_source(rel, content, secs);
        self
    }

    /// Finish building and return the configured fixture.
    pub fn build(self) -> StoreFixture {
        self.fixture
    }
}
