//! CLI command implementations.

pub mod config;
pub mod convert;
pub mod replay;

use clap::ValueEnum;
use earthlord::config::{CoordinateSystem, ConfigFile};

/// Map frame selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FrameArg {
    /// GCJ-02, the shifted frame used by maps in mainland China
    Gcj02,
    /// WGS-84, raw GPS coordinates
    Wgs84,
}

impl From<FrameArg> for CoordinateSystem {
    fn from(frame: FrameArg) -> Self {
        match frame {
            FrameArg::Gcj02 => CoordinateSystem::Gcj02,
            FrameArg::Wgs84 => CoordinateSystem::Wgs84,
        }
    }
}

/// Resolve the output frame: CLI flag first, then config.
pub fn resolve_frame(cli_frame: Option<FrameArg>, config: &ConfigFile) -> CoordinateSystem {
    cli_frame
        .map(CoordinateSystem::from)
        .unwrap_or(config.map.coordinate_system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_frame_prefers_cli() {
        let mut config = ConfigFile::default();
        config.map.coordinate_system = CoordinateSystem::Gcj02;

        assert_eq!(
            resolve_frame(Some(FrameArg::Wgs84), &config),
            CoordinateSystem::Wgs84
        );
        assert_eq!(resolve_frame(None, &config), CoordinateSystem::Gcj02);
    }
}
