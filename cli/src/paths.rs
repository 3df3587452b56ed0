//! Mapping of source paths into the store's single relative namespace.
//!
//! Every source path, whatever its root, is stored under one backup root.
//! The root component is rewritten into a plain segment: a drive letter `C:`
//! becomes `C_drive`, a UNC share `\\server\share` becomes `UNC/server/share`,
//! and the POSIX root `/` is dropped.  All remaining components are kept
//! verbatim, so the mapping is deterministic and stable across runs.
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf, Prefix};

use crate::error::PathError;

/// Encode `path` as a path relative to the store root.
///
/// A leading textual drive (`C:` as the first component) is recognised on
/// every platform, not just Windows, so manifests written on Windows encode
/// identically everywhere.
///
/// # Errors
///
/// Returns [`PathError::ParentComponent`] if the path contains `..`, and
/// [`PathError::Empty`] if nothing remains after encoding.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use sparse_store::paths::encode_path;
///
/// assert_eq!(
///     encode_path(Path::new("C:/Users/bozo/.ssh")).unwrap(),
///     PathBuf::from("C_drive/Users/bozo/.ssh"),
/// );
/// assert_eq!(
///     encode_path(Path::new("/home/bozo/.ssh")).unwrap(),
///     PathBuf::from("home/bozo/.ssh"),
/// );
/// ```
pub fn encode_path(path: &Path) -> Result<PathBuf, PathError> {
    let mut encoded = PathBuf::new();

    for (index, component) in path.components().enumerate() {
        match component {
            Component::Prefix(prefix) => encoded.push(encode_prefix(prefix.kind())),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                return Err(PathError::ParentComponent(path.display().to_string()));
            }
            Component::Normal(name) => {
                if index == 0
                    && let Some(letter) = drive_letter(&name.to_string_lossy())
                {
                    encoded.push(drive_segment(letter));
                } else {
                    encoded.push(name);
                }
            }
        }
    }

    if encoded.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }
    Ok(encoded)
}

/// Return the location of `path`'s stored copy under `backup_root`.
///
/// # Errors
///
/// Propagates [`encode_path`] errors.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use sparse_store::paths::storage_path;
///
/// let stored = storage_path(Path::new("B:/backup"), Path::new("C:/Users/bozo/.ssh")).unwrap();
/// assert_eq!(stored, PathBuf::from("B:/backup/C_drive/Users/bozo/.ssh"));
/// ```
pub fn storage_path(backup_root: &Path, path: &Path) -> Result<PathBuf, PathError> {
    Ok(backup_root.join(encode_path(path)?))
}

/// Segment(s) replacing a Windows path prefix.
fn encode_prefix(prefix: Prefix<'_>) -> PathBuf {
    match prefix {
        Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) => {
            PathBuf::from(drive_segment(char::from(letter)))
        }
        Prefix::UNC(server, share) | Prefix::VerbatimUNC(server, share) => {
            [OsString::from("UNC"), server.to_os_string(), share.to_os_string()]
                .iter()
                .collect()
        }
        Prefix::Verbatim(name) => PathBuf::from(name),
        Prefix::DeviceNS(name) => [OsString::from("device"), name.to_os_string()]
            .iter()
            .collect(),
    }
}

/// Return the drive letter if `component` is exactly `X:`.
fn drive_letter(component: &str) -> Option<char> {
    let mut chars = component.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), Some(':'), None) if letter.is_ascii_alphabetic() => Some(letter),
        _ => None,
    }
}

fn drive_segment(letter: char) -> String {
    format!("{letter}_drive")
}
