//! Stampede command line entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::str::FromStr;
use tracing::debug;

use stampede_config::{ConfigLoader, LogLevel, StampedeConfig};
use stampede_logging::{init_logging_from_config, init_simple_tracing};
use stampede_server::Server;
use stampede_storage::DefaultConnector;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new().load(cli.config.as_ref())?;
    init_logging(&config, cli.log_level.as_deref())?;

    match cli.command {
        Commands::Serve => Server::new(config)?.start().await,
        Commands::Run { file, output } => commands::run::handle_run(&file, output.as_ref(), &DefaultConnector).await,
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Validate { config_file, kind } => {
                commands::config::handle_config_validate(&config_file, kind)
            }
            ConfigCommands::Generate { kind, output, force } => {
                commands::config::handle_config_generate(kind, output.as_ref(), force)
            }
        },
    }
}

/// Install the subscriber, letting `--log-level` override the configured level
fn init_logging(config: &StampedeConfig, log_level: Option<&str>) -> Result<()> {
    let mut logging = config.logging.clone();
    if let Some(level) = log_level {
        match LogLevel::from_str(level) {
            Ok(level) => logging.level = level,
            Err(_) => eprintln!("Invalid log level '{}', keeping '{}'", level, logging.level),
        }
    }

    match init_logging_from_config(&logging) {
        Ok(()) => debug!("Structured logging initialized"),
        Err(e) => {
            eprintln!(
                "Failed to initialize structured logging: {}, falling back to simple tracing",
                e
            );
            init_simple_tracing(&logging.level.to_string())?;
        }
    }
    Ok(())
}
