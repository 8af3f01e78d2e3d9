//! CLI error types.

use std::fmt;
use std::path::PathBuf;

use earthlord::config::ConfigError;
use earthlord::coord::CoordError;
use earthlord::path_tracker::TrackerError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is unusable.
    Config(String),

    /// Invalid coordinate on the command line.
    Coord(CoordError),

    /// The tracker refused an operation.
    Tracker(TrackerError),

    /// Failed to read an input file.
    Read { path: PathBuf, source: std::io::Error },

    /// Malformed line in a fix log.
    FixLog { line: usize, message: String },

    /// Failed to render output.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Coord(e) => write!(f, "Invalid coordinate: {}", e),
            CliError::Tracker(e) => write!(f, "Tracker error: {}", e),
            CliError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            CliError::FixLog { line, message } => {
                write!(f, "Fix log line {}: {}", line, message)
            }
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Coord(e) => Some(e),
            CliError::Tracker(e) => Some(e),
            CliError::Read { source, .. } => Some(source),
            CliError::Config(_) | CliError::FixLog { .. } | CliError::Output(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<TrackerError> for CliError {
    fn from(e: TrackerError) -> Self {
        CliError::Tracker(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
