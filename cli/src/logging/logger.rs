//! Structured console logger backed by `tracing`.
use std::path::PathBuf;

use super::location::log_file_path;
use super::types::Log;
use crate::resources::error::BackupFailure;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// [`Log`] sink that emits `tracing` events.
///
/// Every event also lands in `$XDG_CACHE_HOME/sparse-store/<command>.log`
/// (default `~/.cache/sparse-store/<command>.log`), debug lines included,
/// regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display at the end of a run.  The log
    /// file itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(stage = true, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log the dry-run notice.  The notice itself says it is a dry run, so it
    /// renders as plain information.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log one failure record, tagged with its kind.
    pub fn failure(&self, failure: &BackupFailure) {
        tracing::error!(failure = failure.kind(), "{failure}");
    }

    /// Print the location of the log file, if there is one.
    pub fn print_log_location(&self) {
        if let Some(path) = &self.log_file {
            tracing::info!("log: {}", path.display());
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn failure(&self, failure: &BackupFailure) {
        self.failure(failure);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn log_contents(log: &Logger) -> String {
        let path = log.log_path().expect("log path");
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn log_file_is_created() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path");
        assert!(path.exists(), "log file should exist");
        assert!(log_contents(&log).contains("sparse-store"));
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = log_contents(&log);
        assert!(contents.contains(&format!("DEBUG {marker}")));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("trait-marker-{}", std::process::id());
        let log_ref: &dyn Log = &log;
        log_ref.info(&marker);
        assert!(log_contents(&log).contains(&marker));
    }

    #[test]
    fn warn_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("warn-marker-{}", std::process::id());
        log.warn(&marker);
        let contents = log_contents(&log);
        assert!(contents.contains(&format!("WARN  {marker}")));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn error_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("error-marker-{}", std::process::id());
        log.error(&marker);
        let contents = log_contents(&log);
        assert!(contents.contains(&format!("ERROR {marker}")));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("stage-marker-{}", std::process::id());
        log.stage(&marker);
        let contents = log_contents(&log);
        assert!(contents.contains(&format!("==> {marker}")));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn dry_run_notice_written_as_info() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("dryrun-marker-{}", std::process::id());
        log.dry_run(&marker);
        assert!(log_contents(&log).contains(&format!("INFO  {marker}")));
    }

    #[test]
    fn failure_written_with_kind() {
        let (log, _tmp, _guard) = isolated_logger();
        let failure = BackupFailure::FileCopy {
            path: PathBuf::from("/home/me/id_rsa"),
            stored: PathBuf::from("/store/backup/home/me/id_rsa"),
            reason: "permission denied".to_string(),
        };
        let log_ref: &dyn Log = &log;
        log_ref.failure(&failure);
        let contents = log_contents(&log);
        assert!(contents.contains(&format!("FAIL  [file-copy] {failure}")));
    }

    #[test]
    fn log_file_starts_with_run_header() {
        let (log, _tmp, _guard) = isolated_logger();
        let contents = log_contents(&log);
        let header = contents.lines().next().unwrap();
        assert!(header.starts_with("# sparse-store "));
        assert!(header.contains(" test "));
    }
}
