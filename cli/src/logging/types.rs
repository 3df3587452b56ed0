//! The [`Log`] reporting trait and its no-op implementation.
use crate::resources::error::BackupFailure;

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; [`NullLog`]
/// discards everything.  The mirroring engine only sees `&dyn Log`, so its
/// decisions never depend on which sink is attached.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run notice.
    fn dry_run(&self, msg: &str);
    /// Report a per-path failure record at the end of a run.
    fn failure(&self, failure: &BackupFailure);
}

/// A [`Log`] that discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl Log for NullLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn dry_run(&self, _msg: &str) {}
    fn failure(&self, _failure: &BackupFailure) {}
}
