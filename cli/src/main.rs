//! `sparse-store` command-line entry point.
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use sparse_store::cli::{Cli, Command};
use sparse_store::commands;
use sparse_store::logging::{self, Log, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let logger = Arc::new(Logger::new(name));
    let log: Arc<dyn Log> = Arc::clone(&logger) as Arc<dyn Log>;

    let result = match &args.command {
        Command::Init(opts) => commands::init::run(opts, log.as_ref()),
        Command::Backup(opts) => commands::backup::run(opts, &log),
        Command::Restore(opts) => commands::restore::run(opts, &log),
        Command::RemoveStored(opts) => commands::remove_stored::run(opts, &log),
        Command::Version => {
            commands::version::run(log.as_ref());
            return Ok(());
        }
    };

    logger.print_log_location();
    result
}
