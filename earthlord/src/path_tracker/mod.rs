//! Path tracking
//!
//! Turns a continuous stream of GPS fixes into a sparse, ordered path that
//! outlines the territory a player walks around.
//!
//! # Design
//!
//! - Fixes are recorded as they arrive; only the admission tick appends
//! - Ticks run on a fixed cadence (2 seconds by default) and consume the
//!   latest fix, so bursts of fixes coalesce
//! - The first point is the anchor; later points must be more than 10 m from
//!   the previous one
//! - A revision counter and a `watch` channel tell renderers when to redraw
//!
//! # State machine
//!
//! ```text
//!          start() [authorized]
//!   Idle ─────────────────────────► Tracking
//!    ▲                                 │
//!    └──────────── stop() ─────────────┘
//!
//!   clear(): empty path, revision 0, state unchanged
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use earthlord::path_tracker::{Fix, PathTracker, PathTrackerDriver};
//!
//! let tracker = Arc::new(PathTracker::new(Arc::new(authorization)));
//! tracker.start()?;
//!
//! let (fix_tx, fix_rx) = tokio::sync::mpsc::channel(64);
//! let driver = PathTrackerDriver::spawn(Arc::clone(&tracker), fix_rx, shutdown.clone());
//!
//! // From the location callback
//! fix_tx.send(Fix::now(point)).await?;
//!
//! // From the renderer
//! let path = tracker.current_path();
//! ```

mod config;
mod driver;
mod error;
mod session;
mod tracker;

pub use config::{
    PathTrackerConfig, DEFAULT_CLOSURE_MIN_POINTS, DEFAULT_CLOSURE_THRESHOLD_M,
    DEFAULT_MIN_SPACING_M, DEFAULT_SAMPLE_INTERVAL,
};
pub use driver::{DriverStats, PathTrackerDriver};
pub use error::TrackerError;
pub use session::{Fix, PathSnapshot, PathVersion, TickOutcome, TrackingState};
pub use tracker::PathTracker;
