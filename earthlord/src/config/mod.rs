//! Configuration file handling.
//!
//! Settings live in `~/.earthlord/config.ini`:
//!
//! ```ini
//! [tracking]
//! sample_interval_ms = 2000
//! min_spacing_m = 10
//! closure_threshold_m = 30
//! closure_min_points = 10
//!
//! [map]
//! coordinate_system = gcj02
//! initial_span_m = 1000
//!
//! [logging]
//! level = info
//! ```
//!
//! A missing file yields defaults. Unknown keys are ignored so older
//! binaries keep working with newer files.

mod settings;

pub use settings::{CoordinateSystem, LoggingSettings, MapSettings, TrackingSettings};

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::debug;

use crate::map_overlay::MapCoordinator;
use crate::path_tracker::PathTrackerConfig;
use crate::transform::Converter;

/// Name of the configuration directory under the user's home.
const CONFIG_DIR_NAME: &str = ".earthlord";

/// Name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Parse(parse.to_string()),
        }
    }
}

/// Directory holding Earthlord configuration (`~/.earthlord`).
///
/// Falls back to the current directory when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Full path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// `[tracking]` section.
    pub tracking: TrackingSettings,
    /// `[map]` section.
    pub map: MapSettings,
    /// `[logging]` section.
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location, or defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or defaults if the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("tracking")) {
            let t = &mut config.tracking;
            read_value(section, "tracking", "sample_interval_ms", &mut t.sample_interval_ms)?;
            read_value(section, "tracking", "min_spacing_m", &mut t.min_spacing_m)?;
            read_value(section, "tracking", "closure_threshold_m", &mut t.closure_threshold_m)?;
            read_value(section, "tracking", "closure_min_points", &mut t.closure_min_points)?;
        }

        if let Some(section) = ini.section(Some("map")) {
            let m = &mut config.map;
            read_value(section, "map", "coordinate_system", &mut m.coordinate_system)?;
            read_value(section, "map", "initial_span_m", &mut m.initial_span_m)?;
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = section.get("level") {
                config.logging.level = level.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the components cannot run with.
    fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tracking;
        if t.sample_interval_ms == 0 {
            return Err(invalid("tracking.sample_interval_ms", t.sample_interval_ms));
        }
        if !t.min_spacing_m.is_finite() || t.min_spacing_m < 0.0 {
            return Err(invalid("tracking.min_spacing_m", t.min_spacing_m));
        }
        if !t.closure_threshold_m.is_finite() || t.closure_threshold_m < 0.0 {
            return Err(invalid("tracking.closure_threshold_m", t.closure_threshold_m));
        }
        if !self.map.initial_span_m.is_finite() || self.map.initial_span_m <= 0.0 {
            return Err(invalid("map.initial_span_m", self.map.initial_span_m));
        }
        Ok(())
    }

    /// Render as INI.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("tracking"))
            .set("sample_interval_ms", self.tracking.sample_interval_ms.to_string())
            .set("min_spacing_m", self.tracking.min_spacing_m.to_string())
            .set("closure_threshold_m", self.tracking.closure_threshold_m.to_string())
            .set("closure_min_points", self.tracking.closure_min_points.to_string());
        ini.with_section(Some("map"))
            .set("coordinate_system", self.map.coordinate_system.to_string())
            .set("initial_span_m", self.map.initial_span_m.to_string());
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.clone());
        ini
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_ini().write_to_file(path)?;
        Ok(())
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Path tracker configuration from the `[tracking]` section.
    pub fn tracker_config(&self) -> PathTrackerConfig {
        PathTrackerConfig::default()
            .with_sample_interval(Duration::from_millis(self.tracking.sample_interval_ms))
            .with_min_spacing_m(self.tracking.min_spacing_m)
            .with_closure(
                self.tracking.closure_threshold_m,
                self.tracking.closure_min_points,
            )
    }

    /// Converter for the configured map frame.
    pub fn converter(&self) -> Arc<dyn Converter> {
        self.map.coordinate_system.converter()
    }

    /// Map coordinator configured from the `[map]` section.
    pub fn map_coordinator(&self) -> MapCoordinator {
        MapCoordinator::new(self.converter()).with_initial_span_m(self.map.initial_span_m)
    }
}

fn read_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    let Some(raw) = section.get(key) else {
        return Ok(());
    };
    *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: format!("{}.{}", section_name, key),
        value: raw.to_string(),
    })?;
    Ok(())
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
