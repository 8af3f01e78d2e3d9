//! Earthlord CLI - developer tooling for the tracking core
//!
//! ```text
//! earthlord convert 39.9042 116.4074
//! earthlord replay walk.csv --json
//! earthlord config show
//! ```

mod commands;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use earthlord::config::{config_file_path, ConfigFile};

use commands::config::ConfigCommands;
use commands::convert::ConvertArgs;
use commands::replay::ReplayArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "earthlord", version, about = "Earthlord path tracking tools")]
struct Cli {
    /// Configuration file (defaults to ~/.earthlord/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a WGS-84 point into the map frame
    Convert(ConvertArgs),

    /// Replay a CSV fix log through a path tracker
    Replay(ReplayArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let loaded = ConfigFile::load_from(&config_path);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    earthlord::logging::init(&level);

    let result = loaded
        .map_err(CliError::from)
        .and_then(|config| run(cli.command, &config, &config_path));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &ConfigFile, config_path: &Path) -> Result<(), CliError> {
    tracing::debug!(?command, "Running command");
    match command {
        Commands::Convert(args) => commands::convert::run(args, config),
        Commands::Replay(args) => commands::replay::run(args, config),
        Commands::Config(command) => commands::config::run(command, config, config_path),
    }
}
