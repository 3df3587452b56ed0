//! Mirroring primitives: freshness comparison, pruned tree copy, and the
//! per-path engine that turns them into copy/skip/fail decisions.
pub mod backup_path;
pub mod error;
pub mod freshness;
pub mod helpers;

/// What happened to a single file during a transfer.
///
/// # Examples
///
/// ```
/// use sparse_store::resources::TransferOutcome;
///
/// let copied = TransferOutcome::Copied;
/// assert_ne!(copied, TransferOutcome::UpToDate);
/// assert_ne!(copied, TransferOutcome::KeptNewer);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The file was copied (or would be, in a dry run).
    Copied,
    /// Both sides already carry the same modification time.
    UpToDate,
    /// The destination is newer and was left alone.
    KeptNewer,
}

/// Counters for the files visited in a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferStats {
    /// Number of files copied.
    pub copied: u32,
    /// Number of files already up to date.
    pub up_to_date: u32,
    /// Number of files whose destination was newer and kept.
    pub kept_newer: u32,
}

impl TransferStats {
    /// Create a new empty stats counter.
    ///
    /// # Examples
    ///
    /// ```
    /// use sparse_store::resources::TransferStats;
    ///
    /// let stats = TransferStats::new();
    /// assert_eq!(stats.copied, 0);
    /// assert_eq!(stats.up_to_date, 0);
    /// assert_eq!(stats.kept_newer, 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one file outcome.
    pub const fn record(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Copied => self.copied += 1,
            TransferOutcome::UpToDate => self.up_to_date += 1,
            TransferOutcome::KeptNewer => self.kept_newer += 1,
        }
    }

    /// Format the summary string (e.g. "3 copied, 10 up to date, 1 kept newer").
    ///
    /// # Examples
    ///
    /// ```
    /// use sparse_store::resources::TransferStats;
    ///
    /// let stats = TransferStats { copied: 5, up_to_date: 12, kept_newer: 0 };
    /// assert_eq!(stats.summary(false), "5 copied, 12 up to date");
    /// assert_eq!(stats.summary(true), "5 would copy, 12 up to date");
    /// ```
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would copy" } else { "copied" };
        if self.kept_newer > 0 {
            format!(
                "{} {verb}, {} up to date, {} kept newer",
                self.copied, self.up_to_date, self.kept_newer
            )
        } else {
            format!("{} {verb}, {} up to date", self.copied, self.up_to_date)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_each_outcome() {
        let mut stats = TransferStats::new();
        stats.record(TransferOutcome::Copied);
        stats.record(TransferOutcome::Copied);
        stats.record(TransferOutcome::UpToDate);
        stats.record(TransferOutcome::KeptNewer);
        assert_eq!(
            stats,
            TransferStats {
                copied: 2,
                up_to_date: 1,
                kept_newer: 1,
            }
        );
    }

    #[test]
    fn summary_mentions_kept_newer_only_when_present() {
        let stats = TransferStats {
            copied: 1,
            up_to_date: 2,
            kept_newer: 3,
        };
        assert_eq!(stats.summary(false), "1 copied, 2 up to date, 3 kept newer");
        assert_eq!(
            TransferStats::new().summary(false),
            "0 copied, 0 up to date"
        );
    }
}
