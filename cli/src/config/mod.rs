//! Store layout and manifest configuration.
pub mod manifest;
pub mod yaml;

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::{ConfigError, SparseStoreError};
use manifest::ManifestNode;

/// Name of the manifest file at the store root.
pub const CONFIG_FILE_NAME: &str = "sparse_store.yaml";

/// Name of the mirrored tree's root directory inside the store.
pub const BACKUP_DIR_NAME: &str = "backup";

/// Top-level manifest key holding the selection tree.
pub const BACKUP_SECTION: &str = "backup";

/// Sample manifest written by `init`.
pub const SAMPLE_CONFIG: &str = r#"# This is a sample sparse_store.yaml file. Replace it with your important paths.
backup:
- path_1 # Include all contents of this directory
- path_2: # Include select contents of this directory:
  - relative_dir_path2.1: # Full path is "{path_2}/{relative_dir_path2.1}"
    - relative_file_path_2.1.1 # Full path is "{path_2}/{relative_dir_path2.1}/{relative_file_path_2.1.1}"
  - relative_file_path_2.2 # Full path is "{path_2}/{relative_file_path_2.2}"
"#;

/// Layout of a store on disk: `sparse_store.yaml` plus the `backup/` tree.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store (project) root directory.
    pub root: PathBuf,
}

impl Config {
    /// Describe the store rooted at `root`; nothing is read yet.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Path of the manifest file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Root of the mirrored tree.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        self.root.join(BACKUP_DIR_NAME)
    }

    /// Read and parse the manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(&self) -> Result<Value, ConfigError> {
        yaml::read_yaml_file(&self.config_file())
    }

    /// Write `document` to the manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn dump(&self, document: &Value) -> Result<(), ConfigError> {
        yaml::write_yaml_file(&self.config_file(), document)
    }

    /// Load the manifest file and parse its `backup` section.
    ///
    /// Parsing is all-or-nothing: any format violation anywhere in the tree
    /// fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is unreadable, not YAML, or has
    /// no `backup` key, and a [`ManifestError`](crate::error::ManifestError)
    /// if the section is malformed.
    pub fn manifest(&self) -> Result<ManifestNode, SparseStoreError> {
        let document = self.load()?;
        let section = backup_section(&document)?;
        Ok(ManifestNode::parse(section)?)
    }
}

/// Return the `backup` section of a parsed manifest document.
///
/// # Errors
///
/// Returns [`ConfigError::MissingSection`] if the document has no `backup` key.
pub fn backup_section(document: &Value) -> Result<&Value, ConfigError> {
    document
        .get(BACKUP_SECTION)
        .ok_or_else(|| ConfigError::MissingSection(BACKUP_SECTION.to_string()))
}
