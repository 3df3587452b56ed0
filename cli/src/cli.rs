//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the sparse store.
#[derive(Parser, Debug)]
#[command(
    name = "sparse-store",
    about = "Sparse, manifest-driven file and directory backup",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a store with a sample sparse_store.yaml
    Init(InitOpts),
    /// Mirror the paths selected by the manifest into the store
    Backup(StoreOpts),
    /// Copy stored paths back to their original locations
    Restore(StoreOpts),
    /// Delete the stored copies of the paths selected by the manifest
    RemoveStored(StoreOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Backup(_) => "backup",
            Self::Restore(_) => "restore",
            Self::RemoveStored(_) => "remove-stored",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InitOpts {
    /// Path to create for the store and its configuration
    pub path: PathBuf,

    /// Just show what would have been done
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Use the directory even if it already exists
    #[arg(long)]
    pub force_dir: bool,

    /// Overwrite an existing sparse_store.yaml
    #[arg(long)]
    pub force_config: bool,
}

/// Options shared by the subcommands that operate on an existing store.
#[derive(Parser, Debug, Clone)]
pub struct StoreOpts {
    /// Path of the store
    pub path: PathBuf,

    /// Just show what would have been done
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}
