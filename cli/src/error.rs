//! Domain-specific error types for the sparse store.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`], [`ManifestError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! Per-path backup failures are *not* errors in this sense: they are collected
//! as [`BackupFailure`](crate::resources::error::BackupFailure) records and
//! reported at the end of a run.
//!
//! # Error hierarchy
//!
//! ```text
//! SparseStoreError
//! ├── Config(ConfigError)     — store layout, manifest file I/O and YAML
//! ├── Manifest(ManifestError) — malformed `backup` section
//! └── Path(PathError)         — source path cannot be encoded into the store
//! ```

use thiserror::Error;

/// Top-level error type for the sparse store.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum SparseStoreError {
    /// Configuration-related error (store layout, manifest file).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The manifest's `backup` section is malformed.
    #[error("Manifest format error: {0}")]
    Manifest(#[from] ManifestError),

    /// A source path could not be mapped into the store.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// Errors that arise from loading or writing the store configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required top-level key is absent from `sparse_store.yaml`.
    #[error("Missing required section '{0}'")]
    MissingSection(String),

    /// An I/O error occurred while reading or writing a config file.
    #[error("IO error on config file {path}: {source}")]
    Io {
        /// Path to the file that could not be accessed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid YAML.
    #[error("Invalid YAML in {path}: {source}")]
    InvalidYaml {
        /// Path to the file that failed to parse.
        path: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// `init` was asked to create a store directory that already exists.
    #[error("The store {0} already exists")]
    StoreExists(String),

    /// `init` would overwrite an existing `sparse_store.yaml`.
    #[error("The config file {0} already exists")]
    ConfigExists(String),
}

/// Errors that arise when the manifest structure violates the format.
///
/// Any of these aborts the whole run before a single path is mirrored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// A mapping node has zero or several keys; exactly one is required.
    #[error("expected a mapping with exactly one key, found {} keys: [{}]", keys.len(), keys.join(", "))]
    NotJustASingleKey {
        /// The keys found in the offending mapping.
        keys: Vec<String>,
    },

    /// A single-key mapping whose value is not a sequence.
    #[error("value of '{key}' must be a list, found {found}")]
    DictionaryValueNotAList {
        /// The mapping's key (directory name).
        key: String,
        /// Kind of the value that was found instead.
        found: String,
    },

    /// A node that is neither a sequence, a single-key mapping nor a string.
    #[error("unexpected {found} in manifest")]
    UnexpectedType {
        /// Kind of the offending node.
        found: String,
    },
}

/// Errors that arise when encoding a source path into the store namespace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path contains a `..` component, which would escape the store root.
    #[error("path {0} contains a parent-directory component")]
    ParentComponent(String),

    /// The path has no components at all.
    #[error("path is empty")]
    Empty,
}
