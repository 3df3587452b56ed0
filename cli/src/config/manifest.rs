//! Manifest tree: parsing the `backup` section and resolving it to paths.
//!
//! The manifest grammar is recursive:
//!
//! ```yaml
//! backup:
//! - whole_file_or_directory
//! - scoped_directory:
//!   - child_directory:
//!     - grandchild_file
//!   - child_file
//! ```
//!
//! A string selects a file or a whole directory, a single-key mapping selects
//! only the listed children of a directory, and a list composes its members
//! in order.
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::ManifestError;

/// One node of a parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestNode {
    /// A file, or a directory copied with all of its contents.
    Leaf(String),
    /// A directory of which only `children` are backed up.
    ScopedDirectory {
        /// Directory name, relative to the enclosing node.
        name: String,
        /// Sparse selection inside the directory.
        children: Vec<ManifestNode>,
    },
    /// A plain list; adds no path segment.
    Group(Vec<ManifestNode>),
}

impl ManifestNode {
    /// Classify a parsed YAML value into a manifest tree.
    ///
    /// The whole structure is validated up front, so a malformed manifest
    /// is rejected before any path is resolved.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::NotJustASingleKey`] for a mapping with zero or
    ///   several keys;
    /// - [`ManifestError::DictionaryValueNotAList`] for a mapping whose value
    ///   is not a sequence;
    /// - [`ManifestError::UnexpectedType`] for anything that is not a
    ///   sequence, mapping or string (including non-string mapping keys).
    pub fn parse(value: &Value) -> Result<Self, ManifestError> {
        match value {
            Value::Sequence(items) => items
                .iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Group),
            Value::Mapping(mapping) => Self::parse_mapping(mapping),
            Value::String(name) => Ok(Self::Leaf(name.clone())),
            other => Err(ManifestError::UnexpectedType {
                found: kind(other).to_string(),
            }),
        }
    }

    fn parse_mapping(mapping: &Mapping) -> Result<Self, ManifestError> {
        let mut entries = mapping.iter();
        let (key, child) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(ManifestError::NotJustASingleKey {
                    keys: mapping.keys().map(key_label).collect(),
                });
            }
        };

        let Value::String(name) = key else {
            return Err(ManifestError::UnexpectedType {
                found: format!("{} key", kind(key)),
            });
        };

        let Value::Sequence(items) = child else {
            return Err(ManifestError::DictionaryValueNotAList {
                key: name.clone(),
                found: kind(child).to_string(),
            });
        };

        let children = items
            .iter()
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::ScopedDirectory {
            name: name.clone(),
            children,
        })
    }

    /// Resolve the tree against `root`, yielding absolute source paths.
    ///
    /// Traversal is depth-first in declaration order.  Duplicates reached
    /// through different branches are yielded once per occurrence.  The
    /// iterator borrows the tree, so calling `resolve` again restarts from
    /// the beginning and yields the identical sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use sparse_store::config::manifest::ManifestNode;
    ///
    /// let manifest = ManifestNode::Group(vec![
    ///     ManifestNode::ScopedDirectory {
    ///         name: "home".into(),
    ///         children: vec![ManifestNode::Leaf(".bashrc".into())],
    ///     },
    ///     ManifestNode::Leaf("etc".into()),
    /// ]);
    /// let paths: Vec<PathBuf> = manifest.resolve(Path::new("/")).collect();
    /// assert_eq!(paths, [PathBuf::from("/home/.bashrc"), PathBuf::from("/etc")]);
    /// ```
    #[must_use]
    pub fn resolve(&self, root: &Path) -> ResolvedPaths<'_> {
        ResolvedPaths {
            stack: vec![(self, root.to_path_buf())],
        }
    }

    /// Convert the tree back into the YAML structure it was parsed from.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Leaf(name) => Value::String(name.clone()),
            Self::ScopedDirectory { name, children } => {
                let mut mapping = Mapping::new();
                mapping.insert(
                    Value::String(name.clone()),
                    Value::Sequence(children.iter().map(Self::to_value).collect()),
                );
                Value::Mapping(mapping)
            }
            Self::Group(members) => Value::Sequence(members.iter().map(Self::to_value).collect()),
        }
    }
}

/// Lazy, depth-first iterator over the paths selected by a manifest.
///
/// Created by [`ManifestNode::resolve`].
#[derive(Debug)]
pub struct ResolvedPaths<'a> {
    stack: Vec<(&'a ManifestNode, PathBuf)>,
}

impl Iterator for ResolvedPaths<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some((node, root)) = self.stack.pop() {
            match node {
                ManifestNode::Leaf(name) => return Some(root.join(name)),
                ManifestNode::ScopedDirectory { name, children } => {
                    let dir = root.join(name);
                    self.stack
                        .extend(children.iter().rev().map(|child| (child, dir.clone())));
                }
                ManifestNode::Group(members) => {
                    self.stack
                        .extend(members.iter().rev().map(|member| (member, root.clone())));
                }
            }
        }
        None
    }
}

/// Human-readable name of a YAML value's kind.
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn key_label(key: &Value) -> String {
    key.as_str()
        .map_or_else(|| format!("<{}>", kind(key)), String::from)
}
