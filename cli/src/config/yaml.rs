//! YAML manifest file reading and writing.
use std::path::Path;

use serde_yaml::Value;

use crate::error::ConfigError;

/// Parse YAML text into a structured value.
///
/// Mapping order is preserved, which keeps manifest resolution in
/// declaration order.
///
/// # Errors
///
/// Returns an error if `text` is not valid YAML.
pub fn load_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Serialize a structured value as block-style YAML.
///
/// Sequences under a mapping key are written without extra indentation
/// (`key:\n- item`), matching the canonical manifest layout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn dump_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

/// Read and parse the YAML file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::InvalidYaml`] if it does not parse.
pub fn read_yaml_file(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    load_yaml(&content).map_err(|source| ConfigError::InvalidYaml {
        path: path.display().to_string(),
        source,
    })
}

/// Serialize `value` and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_yaml_file(path: &Path, value: &Value) -> Result<(), ConfigError> {
    let text = dump_yaml(value).map_err(|source| ConfigError::InvalidYaml {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
