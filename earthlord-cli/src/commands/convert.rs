//! `convert` command: transform a single WGS-84 point.

use clap::Args;
use earthlord::config::ConfigFile;
use earthlord::coord::GeoPoint;
use earthlord::transform;

use super::{resolve_frame, FrameArg};
use crate::error::CliError;

/// Arguments for `earthlord convert`.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Latitude in degrees (WGS-84)
    #[arg(allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude in degrees (WGS-84)
    #[arg(allow_negative_numbers = true)]
    pub longitude: f64,

    /// Output frame (defaults to the configured map frame)
    #[arg(long, value_enum)]
    pub frame: Option<FrameArg>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the convert command.
pub fn run(args: ConvertArgs, config: &ConfigFile) -> Result<(), CliError> {
    let input = GeoPoint::new(args.latitude, args.longitude)?;
    let frame = resolve_frame(args.frame, config);
    let output = frame.converter().convert(input);
    let in_region = transform::is_in_region(&input);

    if args.json {
        let value = serde_json::json!({
            "input": input,
            "output": output,
            "frame": frame.to_string(),
            "in_region": in_region,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("WGS-84:  {}", input);
    println!("{:<8} {}", format!("{}:", frame), output);
    if !in_region {
        println!("(outside the GCJ-02 region, unchanged)");
    }
    Ok(())
}
