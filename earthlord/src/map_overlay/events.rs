//! Messages exchanged with the rendering surface.

use crate::coord::GeoPoint;
use crate::path_tracker::PathSnapshot;

/// Something the map surface or the tracker reports to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The platform reported a new user position (WGS-84).
    UserLocationUpdated(GeoPoint),
    /// The user panned or zoomed; `center` is in the map's own frame.
    RegionChanged {
        /// Visible region center.
        center: GeoPoint,
    },
    /// The tracked path changed.
    PathChanged(PathSnapshot),
}

/// An instruction for the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Move the camera to `center` showing roughly `span_m` meters.
    CenterOn {
        /// Camera center, already in the map's frame.
        center: GeoPoint,
        /// Visible span in meters, both directions.
        span_m: f64,
    },
    /// Remove every overlay and draw `polyline` if present.
    ReplaceOverlays {
        /// Path geometry in the map's frame; `None` when there is nothing
        /// to draw.
        polyline: Option<Vec<GeoPoint>>,
        /// Whether the path is a closed loop.
        closed: bool,
    },
}
