//! Main entry point for the dbmsg command-line tool.

use anyhow::{anyhow, Result};
use clap::Parser;
use dbmsg_cli::{App, Cli};
use dbmsg_common::init_logging;
use dbmsg_config::{Config, ConfigLoader};
use std::io;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    init_logging(config.logging.clone())
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
    debug!(store = %config.store.path, basenames = %config.messages.basename, "Configuration loaded");

    let app = App::open(config)?;
    let stdout = io::stdout();
    app.run(&cli.command, &mut stdout.lock())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(store) = &cli.store {
        config.store.path.clone_from(store);
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    Ok(config)
}
