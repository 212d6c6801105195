//! CLI argument parsing definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the service configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the job submission server
    Serve,

    /// Run one stage in the foreground and print its report
    Run {
        /// Submission file (JSON or YAML) with data source and stage profile
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        /// Also write the JSON report to this path
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,

        /// What the file contains
        #[arg(long, value_enum, default_value_t = ConfigKind::Service)]
        kind: ConfigKind,
    },

    /// Generate a sample configuration file
    Generate {
        /// What to generate
        #[arg(long, value_enum, default_value_t = ConfigKind::Service)]
        kind: ConfigKind,

        /// Output file path; prints to stdout when omitted
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

/// Kind of configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKind {
    /// Server and logging settings
    Service,
    /// Stage submission payload
    Submission,
}
