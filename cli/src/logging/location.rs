//! Where run logs live on disk.
use std::ffi::OsString;
use std::path::PathBuf;

/// Directory name under the cache home.
const LOG_DIR_NAME: &str = "sparse-store";

/// Base cache directory: `$XDG_CACHE_HOME`, else `~/.cache`, else `./.cache`.
fn cache_home() -> PathBuf {
    let non_empty = |v: OsString| (!v.is_empty()).then(|| PathBuf::from(v));
    std::env::var_os("XDG_CACHE_HOME")
        .and_then(non_empty)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .and_then(non_empty)
                .map(|home| home.join(".cache"))
        })
        .unwrap_or_else(|| PathBuf::from(".cache"))
}

/// Path of the log file for `command`, creating its directory.
///
/// One file per subcommand, overwritten on every run, so `backup.log` always
/// describes the most recent backup.  `None` when the directory cannot be
/// created; logging then stays console-only.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_home().join(LOG_DIR_NAME);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
