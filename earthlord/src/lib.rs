//! Earthlord - territory tracking core
//!
//! This library provides the location core of the Earthlord territory game:
//! it samples the player's GPS fixes into a path and converts that path into
//! the coordinate frame of the map it is drawn on.
//!
//! # Modules
//!
//! - [`coord`]: `GeoPoint`, validation and great-circle distance
//! - [`transform`]: WGS-84 to GCJ-02 conversion
//! - [`path_tracker`]: fix sampling, spacing and loop closure
//! - [`permission`]: location authorization oracle
//! - [`map_overlay`]: event-driven redraw decisions for the map surface
//! - [`config`]: INI configuration file
//! - [`logging`]: `tracing` subscriber setup
//!
//! # Data flow
//!
//! ```text
//! GPS fixes ──► PathTracker ──► WGS-84 path ──► transform::convert_all ──► map
//! ```

pub mod config;
pub mod coord;
pub mod logging;
pub mod map_overlay;
pub mod path_tracker;
pub mod permission;
pub mod transform;
