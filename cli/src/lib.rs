//! Sparse, manifest-driven backup engine.
//!
//! A YAML manifest (`sparse_store.yaml`) selects a sparse subset of one or
//! more directory trees.  Each selected path is mirrored into the store's
//! `backup/` tree under an encoded location, skipping every file whose
//! stored copy is already at least as new as the source.
//!
//! The public API is organised into these layers:
//!
//! - **[`paths`]**: map source paths into the store namespace
//! - **[`config`]**: store layout, YAML codec, manifest parsing and resolution
//! - **[`resources`]**: freshness verdicts, pruned tree copy, per-path mirroring
//! - **[`store`]**: run the mirroring engine over every resolved path
//! - **[`commands`]**: top-level subcommand orchestration (`init`, `backup`, `restore`, `remove-stored`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod resources;
pub mod store;
