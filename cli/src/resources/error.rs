//! Per-path failure records produced by the mirroring engine.
//!
//! This module provides [`BackupFailure`], a structured record of a single
//! path that could not be mirrored.  Failures are collected and returned as
//! data; they never abort the remaining paths of a run.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A non-fatal failure to mirror one resolved path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackupFailure {
    /// The path does not exist on the side being copied from.
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Copying a directory tree failed part-way.
    #[error("could not copy directory {} to {}: {reason}", path.display(), stored.display())]
    DirectoryCopy {
        /// Directory being copied from.
        path: PathBuf,
        /// Directory being copied into.
        stored: PathBuf,
        /// Underlying error, rendered.
        reason: String,
    },

    /// Copying a single file failed.
    #[error("could not copy file {} to {}: {reason}", path.display(), stored.display())]
    FileCopy {
        /// File being copied from.
        path: PathBuf,
        /// File being copied into.
        stored: PathBuf,
        /// Underlying error, rendered.
        reason: String,
    },

    /// The path exists but is neither a regular file nor a directory.
    #[error("unrecognized path type: {}", path.display())]
    UnrecognizedPathType {
        /// The offending path.
        path: PathBuf,
    },

    /// The path cannot be mapped into the store namespace.
    #[error("cannot store {}: {reason}", path.display())]
    InvalidStorePath {
        /// The offending source path.
        path: PathBuf,
        /// Why encoding was rejected.
        reason: String,
    },
}

impl BackupFailure {
    /// The path this failure is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound { path }
            | Self::DirectoryCopy { path, .. }
            | Self::FileCopy { path, .. }
            | Self::UnrecognizedPathType { path }
            | Self::InvalidStorePath { path, .. } => path,
        }
    }

    /// Short, stable name of the failure kind, as recorded in the log file.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PathNotFound { .. } => "not-found",
            Self::DirectoryCopy { .. } => "directory-copy",
            Self::FileCopy { .. } => "file-copy",
            Self::UnrecognizedPathType { .. } => "unrecognized",
            Self::InvalidStorePath { .. } => "invalid-path",
        }
    }
}
