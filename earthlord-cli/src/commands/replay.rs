//! `replay` command: feed a recorded fix log through a path tracker.
//!
//! The log is CSV with one fix per line:
//!
//! ```text
//! latitude,longitude[,timestamp[,accuracy_m]]
//! 39.9042,116.4074,2024-05-01T08:00:00Z,5
//! ```
//!
//! Timestamps are RFC 3339. Blank lines, `#` comments and a leading header
//! row are skipped. Each fix is treated as arriving in its own sample
//! interval, so every fix gets exactly one admission tick.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::DateTime;
use clap::Args;
use earthlord::config::ConfigFile;
use earthlord::coord::GeoPoint;
use earthlord::path_tracker::{Fix, PathSnapshot, PathTracker, PathTrackerConfig, TickOutcome};
use earthlord::permission::AuthorizationStatus;
use tracing::info;

use super::{resolve_frame, FrameArg};
use crate::error::CliError;

/// Arguments for `earthlord replay`.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// CSV fix log
    pub file: PathBuf,

    /// Output frame (defaults to the configured map frame)
    #[arg(long, value_enum)]
    pub frame: Option<FrameArg>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Summary of one replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    /// Fixes read from the log.
    pub fixes: usize,
    /// Fixes appended to the path.
    pub accepted: u64,
    /// Fixes dropped by the spacing rule.
    pub too_close: u64,
    /// Final path in WGS-84.
    pub path: PathSnapshot,
}

/// Run the replay command.
pub fn run(args: ReplayArgs, config: &ConfigFile) -> Result<(), CliError> {
    let fixes = read_fix_log(&args.file)?;
    let report = replay(&fixes, config.tracker_config())?;

    let frame = resolve_frame(args.frame, config);
    let converted = frame.converter().convert_all(&report.path.points);

    if args.json {
        let value = serde_json::json!({
            "fixes": report.fixes,
            "accepted": report.accepted,
            "too_close": report.too_close,
            "revision": report.path.revision,
            "closed": report.path.closed,
            "frame": frame.to_string(),
            "path": converted,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "Replayed {} fixes: {} accepted, {} too close",
        report.fixes, report.accepted, report.too_close
    );
    println!(
        "Revision {}, {}",
        report.path.revision,
        if report.path.closed { "closed loop" } else { "open path" }
    );
    println!("Path ({}):", frame);
    for (i, point) in converted.iter().enumerate() {
        println!("  {:>4}  {}", i + 1, point);
    }
    Ok(())
}

/// Replay fixes through a fresh tracker, one tick per fix.
///
/// Closure is checked once after the last fix.
pub fn replay(fixes: &[Fix], config: PathTrackerConfig) -> Result<ReplayReport, CliError> {
    let tracker =
        PathTracker::with_config(config, Arc::new(AuthorizationStatus::AuthorizedAlways));
    tracker.start()?;

    let mut accepted = 0;
    let mut too_close = 0;
    for fix in fixes {
        tracker.submit_fix(*fix)?;
        match tracker.tick() {
            TickOutcome::Anchored(_) | TickOutcome::Appended { .. } => accepted += 1,
            TickOutcome::TooClose { .. } => too_close += 1,
            TickOutcome::NotTracking | TickOutcome::NoNewFix => {}
        }
    }
    tracker.check_closure();
    tracker.stop();

    let path = tracker.current_path();
    info!(
        fixes = fixes.len(),
        accepted,
        closed = path.closed,
        "Replay complete"
    );

    Ok(ReplayReport {
        fixes: fixes.len(),
        accepted,
        too_close,
        path,
    })
}

/// Read and parse a fix log from disk.
pub fn read_fix_log(path: &Path) -> Result<Vec<Fix>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fix_log(&text)
}

/// Parse fix log text.
pub fn parse_fix_log(text: &str) -> Result<Vec<Fix>, CliError> {
    let mut fixes = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if fixes.is_empty() && is_header(line) {
            continue;
        }

        let fix = parse_line(line).map_err(|message| CliError::FixLog {
            line: index + 1,
            message,
        })?;
        fixes.push(fix);
    }

    Ok(fixes)
}

fn is_header(line: &str) -> bool {
    line.split(',')
        .next()
        .is_some_and(|field| field.trim().starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn parse_line(line: &str) -> Result<Fix, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 2 || fields.len() > 4 {
        return Err(format!("expected 2 to 4 fields, found {}", fields.len()));
    }

    let latitude = parse_number(fields[0], "latitude")?;
    let longitude = parse_number(fields[1], "longitude")?;
    let point = GeoPoint::new(latitude, longitude).map_err(|e| e.to_string())?;

    let timestamp = match fields.get(2) {
        Some(field) if !field.is_empty() => DateTime::parse_from_rfc3339(field)
            .map(SystemTime::from)
            .map_err(|e| format!("invalid timestamp '{}': {}", field, e))?,
        _ => SystemTime::now(),
    };

    let mut fix = Fix::at(point, timestamp);
    if let Some(field) = fields.get(3).filter(|f| !f.is_empty()) {
        fix = fix.with_accuracy_m(parse_number(field, "accuracy")?);
    }
    Ok(fix)
}

fn parse_number(field: &str, name: &str) -> Result<f64, String> {
    field
        .parse()
        .map_err(|_| format!("invalid {} '{}'", name, field))
}
