//! Three-way modification-time comparison between a path and its copy.
use std::cmp::Ordering;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::operations::FileSystemOps;

/// Outcome of comparing a path with its copy on the other side.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use sparse_store::resources::freshness::Freshness;
///
/// let older = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
/// let newer = SystemTime::UNIX_EPOCH + Duration::from_secs(20);
///
/// assert_eq!(Freshness::between(newer, older), Freshness::SourceNewer);
/// assert_eq!(Freshness::between(older, older), Freshness::Equal);
/// assert_eq!(Freshness::between(older, newer), Freshness::StoreNewer);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The copy is strictly newer than the path it was taken from.
    StoreNewer,
    /// Both timestamps are identical.
    Equal,
    /// The path is newer than its copy, or there is no copy yet.
    SourceNewer,
}

impl Freshness {
    /// Compare two modification times.
    #[must_use]
    pub fn between(source: SystemTime, stored: SystemTime) -> Self {
        match stored.cmp(&source) {
            Ordering::Greater => Self::StoreNewer,
            Ordering::Equal => Self::Equal,
            Ordering::Less => Self::SourceNewer,
        }
    }

    /// Whether the copy must be (re)written.
    #[must_use]
    pub const fn needs_copy(self) -> bool {
        matches!(self, Self::SourceNewer)
    }
}

/// Compare `source` against its copy at `stored`.
///
/// `source` must exist.  A missing `stored` short-circuits to
/// [`Freshness::SourceNewer`] without reading any timestamp.
///
/// # Errors
///
/// Returns an error if a modification time cannot be read.
pub fn compare(fs: &dyn FileSystemOps, source: &Path, stored: &Path) -> io::Result<Freshness> {
    if !fs.exists(stored) {
        return Ok(Freshness::SourceNewer);
    }
    Ok(Freshness::between(fs.modified(source)?, fs.modified(stored)?))
}
