//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the mirroring engine can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use filetime::FileTime;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Abstraction over the filesystem primitives used by the mirroring engine.
///
/// Implement this trait to swap in a mock during unit tests, keeping the
/// copy/skip decisions independent of real I/O.  The production
/// implementation is [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists (following symlinks).
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> bool;

    /// Modification timestamp of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Returns the immediate child paths inside `path`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy the contents of file `from` to `to`, then stamp `to` with the
    /// modification time of `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy or the timestamp update fails.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove the directory at `path` and everything beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let modified = std::fs::metadata(from)?.modified()?;
        // `copy` carries permission bits over, so copies of read-only sources
        // are read-only: replace them rather than open them for writing.
        if std::fs::symlink_metadata(to).is_ok_and(|m| m.permissions().readonly()) {
            std::fs::remove_file(to)?;
        }
        std::fs::copy(from, to)?;
        filetime::set_file_mtime(to, FileTime::from_system_time(modified))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Pre-configure files (with timestamps), directories and special entries
/// using the builder-style methods, then inject failures with
/// [`deny_read`](Self::deny_read) and [`fail_copy_to`](Self::fail_copy_to).
/// Mutating operations update the in-memory tree, so a test can inspect the
/// result with [`modified_at`](Self::modified_at) and
/// [`copy_count`](Self::copy_count).
///
/// # Example
///
/// ```ignore
/// use sparse_store::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new()
///     .with_file("/src/notes.txt", 10)
///     .with_dir("/store/backup");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    entries: std::sync::Mutex<std::collections::BTreeMap<PathBuf, MockEntry>>,
    denied: std::collections::HashSet<PathBuf>,
    failing_copies: std::collections::HashSet<PathBuf>,
    copies: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockEntry {
    File(SystemTime),
    Dir,
    Special,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp `secs` seconds after the Unix epoch.
    #[must_use]
    pub fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs)
    }

    /// Add a regular file modified at `secs`; ancestors become directories.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, secs: u64) -> Self {
        self.insert(path.into(), MockEntry::File(Self::at(secs)));
        self
    }

    /// Add a directory; ancestors become directories.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Dir);
        self
    }

    /// Add an entry that is neither a file nor a directory (socket, device…).
    #[must_use]
    pub fn with_special(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), MockEntry::Special);
        self
    }

    /// Make `read_dir` on `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn deny_read(mut self, path: impl Into<PathBuf>) -> Self {
        self.denied.insert(path.into());
        self
    }

    /// Make `copy_file` into `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn fail_copy_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_copies.insert(path.into());
        self
    }

    /// Modification time of the file at `path`, if it is a file.
    #[must_use]
    pub fn modified_at(&self, path: &Path) -> Option<SystemTime> {
        match self.lock().get(path) {
            Some(MockEntry::File(time)) => Some(*time),
            _ => None,
        }
    }

    /// Number of successful `copy_file` calls so far.
    #[must_use]
    pub fn copy_count(&self) -> usize {
        self.copies.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, std::collections::BTreeMap<PathBuf, MockEntry>> {
        self.entries.lock().expect("mock entries poisoned")
    }

    fn insert(&self, path: PathBuf, entry: MockEntry) {
        let mut entries = self.lock();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries.entry(ancestor.to_path_buf()).or_insert(MockEntry::Dir);
        }
        entries.insert(path, entry);
    }

    fn permission_denied(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("mock: permission denied: {}", path.display()),
        )
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("mock: not found: {}", path.display()),
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().get(path) == Some(&MockEntry::Dir)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::File(_)))
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.modified_at(path).ok_or_else(|| Self::not_found(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if self.denied.contains(path) {
            return Err(Self::permission_denied(path));
        }
        if !self.is_dir(path) {
            return Err(Self::not_found(path));
        }
        Ok(self
            .lock()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.lock().get(path).is_some_and(|e| *e != MockEntry::Dir) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("mock: not a directory: {}", path.display()),
            ));
        }
        self.insert(path.to_path_buf(), MockEntry::Dir);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.failing_copies.contains(to) {
            return Err(Self::permission_denied(to));
        }
        let modified = self.modified(from)?;
        let parent_is_dir = to.parent().is_none_or(|p| self.is_dir(p));
        if !parent_is_dir {
            return Err(Self::not_found(to));
        }
        self.lock().insert(to.to_path_buf(), MockEntry::File(modified));
        self.copies
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut entries = self.lock();
        if entries.remove(path).is_none() {
            return Err(Self::not_found(path));
        }
        entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
