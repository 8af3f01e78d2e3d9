//! Configuration CLI commands.
//!
//! Provides `config path` and `config show`.

use std::path::Path;

use clap::Subcommand;
use earthlord::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config: &ConfigFile, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            if !path.exists() {
                println!("(file does not exist, defaults in effect)");
            }
        }
        ConfigCommands::Show => {
            for line in render(config) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Effective configuration as display lines, grouped by section.
fn render(config: &ConfigFile) -> Vec<String> {
    let t = &config.tracking;
    let m = &config.map;
    vec![
        "[tracking]".to_string(),
        format!("  sample_interval_ms = {}", t.sample_interval_ms),
        format!("  min_spacing_m = {}", t.min_spacing_m),
        format!("  closure_threshold_m = {}", t.closure_threshold_m),
        format!("  closure_min_points = {}", t.closure_min_points),
        String::new(),
        "[map]".to_string(),
        format!("  coordinate_system = {}", m.coordinate_system),
        format!("  initial_span_m = {}", m.initial_span_m),
        String::new(),
        "[logging]".to_string(),
        format!("  level = {}", config.logging.level),
    ]
}
