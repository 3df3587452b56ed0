//! Init command implementation.
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitOpts;
use crate::config::{BACKUP_DIR_NAME, Config, SAMPLE_CONFIG};
use crate::error::ConfigError;
use crate::logging::Log;

/// Run the init command: create the store directory, its `backup/` tree and
/// a commented sample manifest.
///
/// # Errors
///
/// Returns an error if the directory or manifest already exists and the
/// matching `--force-*` flag was not given, or if any write fails.
pub fn run(opts: &InitOpts, log: &dyn Log) -> Result<()> {
    let path = &opts.path;
    let perform = !opts.dry_run;

    log.info(&format!("Store: {}", path.display()));
    if opts.dry_run {
        log.dry_run("This is a dry run of init.");
    }

    if path.exists() && !opts.force_dir {
        log.error(
            "The store already exists. Please use a path that you want to create or use --force-dir, as in:",
        );
        log.error(&suggestion(opts, true, opts.force_config));
        return Err(ConfigError::StoreExists(path.display().to_string()).into());
    }
    if path.exists() {
        log.info(&format!("Using \"{}\" as store.", path.display()));
    } else {
        log.info(&format!("Creating \"{}\" as store.", path.display()));
        if perform {
            create_dir(path)?;
        }
    }

    let config = Config::new(path);
    if perform {
        let backup = config.backup_path();
        create_dir(&backup)?;
        let keep = backup.join(".gitkeep");
        if !keep.exists() {
            fs::write(&keep, "").with_context(|| format!("creating {}", keep.display()))?;
        }
    }

    let config_file = config.config_file();
    if config_file.exists() && !opts.force_config {
        log.error(
            "The store sparse_store.yaml file already exists. Please use a path that you want to create or use --force-config to wipe it, as in:",
        );
        log.error(&suggestion(opts, opts.force_dir, true));
        return Err(ConfigError::ConfigExists(config_file.display().to_string()).into());
    }
    let gerund = if config_file.exists() {
        "Overwriting"
    } else {
        "Writing"
    };
    log.info(&format!("{gerund} config file: \"{}\"", config_file.display()));
    if perform {
        fs::write(&config_file, SAMPLE_CONFIG)
            .with_context(|| format!("writing {}", config_file.display()))?;
    }

    log.debug(&format!(
        "store layout: {} + {BACKUP_DIR_NAME}/",
        config_file.display()
    ));
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("creating directory {}", path.display()))
}

/// The command line to re-run with, given which force flags to include.
fn suggestion(opts: &InitOpts, force_dir: bool, force_config: bool) -> String {
    format!(
        "sparse-store init{}{}{} \"{}\"",
        if opts.dry_run { " --dry-run" } else { "" },
        if force_dir { " --force-dir" } else { "" },
        if force_config { " --force-config" } else { "" },
        opts.path.display()
    )
}
