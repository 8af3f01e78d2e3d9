//! The single owner of redraw decisions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::events::{MapEvent, RenderCommand};
use crate::coord::GeoPoint;
use crate::path_tracker::{PathSnapshot, PathTracker, PathVersion};
use crate::transform::{Converter, Gcj02};

/// Default camera span when first centering on the user, in meters.
pub const DEFAULT_INITIAL_SPAN_M: f64 = 1000.0;

/// Minimum number of points for a path to be drawn.
const MIN_POINTS_TO_DRAW: usize = 2;

/// Turns map and path events into render commands.
///
/// Rules:
/// - the first user location centers the camera once; later ones never do
/// - a path snapshot whose version was already drawn is ignored
/// - a redraw always replaces every overlay; paths with fewer than two
///   points draw nothing
/// - region changes are recorded and never trigger a redraw
pub struct MapCoordinator {
    converter: Arc<dyn Converter>,
    initial_span_m: f64,
    has_centered: bool,
    last_drawn: Option<PathVersion>,
    last_center: Option<GeoPoint>,
    user_location: Option<GeoPoint>,
}

impl std::fmt::Debug for MapCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCoordinator")
            .field("converter", &self.converter.name())
            .field("initial_span_m", &self.initial_span_m)
            .field("has_centered", &self.has_centered)
            .field("last_drawn", &self.last_drawn)
            .finish()
    }
}

impl Default for MapCoordinator {
    fn default() -> Self {
        Self::new(Arc::new(Gcj02))
    }
}

impl MapCoordinator {
    /// Create a coordinator drawing in the converter's frame.
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self {
            converter,
            initial_span_m: DEFAULT_INITIAL_SPAN_M,
            has_centered: false,
            last_drawn: None,
            last_center: None,
            user_location: None,
        }
    }

    /// Set the camera span used for the initial centering.
    pub fn with_initial_span_m(mut self, span_m: f64) -> Self {
        self.initial_span_m = span_m;
        self
    }

    /// Whether the camera has been centered on the user.
    pub fn has_centered(&self) -> bool {
        self.has_centered
    }

    /// Last visible region center reported by the surface.
    pub fn last_center(&self) -> Option<GeoPoint> {
        self.last_center
    }

    /// Last user location reported by the platform (WGS-84).
    pub fn user_location(&self) -> Option<GeoPoint> {
        self.user_location
    }

    /// Process one event, returning the commands it produces.
    pub fn handle_event(&mut self, event: MapEvent) -> Vec<RenderCommand> {
        match event {
            MapEvent::UserLocationUpdated(location) => self.on_user_location(location),
            MapEvent::RegionChanged { center } => {
                debug!(%center, "Map region changed");
                self.last_center = Some(center);
                Vec::new()
            }
            MapEvent::PathChanged(snapshot) => self.on_path_changed(snapshot),
        }
    }

    fn on_user_location(&mut self, location: GeoPoint) -> Vec<RenderCommand> {
        self.user_location = Some(location);
        if self.has_centered {
            return Vec::new();
        }

        self.has_centered = true;
        let center = self.converter.convert(location);
        info!(%center, span_m = self.initial_span_m, "Centering map on user");
        vec![RenderCommand::CenterOn {
            center,
            span_m: self.initial_span_m,
        }]
    }

    fn on_path_changed(&mut self, snapshot: PathSnapshot) -> Vec<RenderCommand> {
        let version = snapshot.version();
        if self.last_drawn == Some(version) {
            return Vec::new();
        }
        self.last_drawn = Some(version);

        let polyline = if snapshot.len() < MIN_POINTS_TO_DRAW {
            debug!(points = snapshot.len(), "Path too short to draw");
            None
        } else {
            debug!(points = snapshot.len(), revision = version.revision, "Redrawing path");
            Some(self.converter.convert_all(&snapshot.points))
        };

        vec![RenderCommand::ReplaceOverlays {
            polyline,
            closed: snapshot.closed,
        }]
    }

    /// Consume events until cancelled or either channel closes.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<MapEvent>,
        commands: mpsc::Sender<RenderCommand>,
        cancellation: CancellationToken,
    ) -> Self {
        info!(frame = self.converter.name(), "Map coordinator started");

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => break,

                event_opt = events.recv() => {
                    let Some(event) = event_opt else { break };
                    for command in self.handle_event(event) {
                        if commands.send(command).await.is_err() {
                            debug!("Render surface dropped its command channel");
                            info!("Map coordinator stopped");
                            return self;
                        }
                    }
                }
            }
        }

        info!("Map coordinator stopped");
        self
    }
}

/// Forward tracker path changes to a coordinator's event channel.
///
/// Waits on the tracker's version channel and sends a fresh snapshot each
/// time it changes. Intermediate versions may be skipped; the snapshot sent
/// is always the latest.
pub fn forward_path_changes(
    tracker: Arc<PathTracker>,
    events: mpsc::Sender<MapEvent>,
    cancellation: CancellationToken,
) -> JoinHandle<()> {
    let mut versions = tracker.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => break,

                changed = versions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = tracker.current_path();
                    if events.send(MapEvent::PathChanged(snapshot)).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_tracker::TrackingState;
    use crate::permission::AuthorizationStatus;
    use crate::transform::{self, Identity};

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new_unchecked(lat, lon)
    }

    fn snapshot(points: Vec<GeoPoint>, revision: u64) -> PathSnapshot {
        PathSnapshot {
            points,
            revision,
            closed: false,
            state: TrackingState::Tracking,
        }
    }

    const BEIJING: GeoPoint = GeoPoint::new_unchecked(39.9042, 116.4074);

    #[test]
    fn test_first_location_centers_once() {
        let mut coordinator = MapCoordinator::default();

        let commands = coordinator.handle_event(MapEvent::UserLocationUpdated(BEIJING));
        assert_eq!(
            commands,
            vec![RenderCommand::CenterOn {
                center: transform::convert(BEIJING),
                span_m: 1000.0,
            }]
        );
        assert!(coordinator.has_centered());

        let again = coordinator.handle_event(MapEvent::UserLocationUpdated(point(39.91, 116.41)));
        assert!(again.is_empty());
        assert_eq!(coordinator.user_location(), Some(point(39.91, 116.41)));
    }

    #[test]
    fn test_region_change_is_recorded_only() {
        let mut coordinator = MapCoordinator::default();
        let commands = coordinator.handle_event(MapEvent::RegionChanged { center: BEIJING });
        assert!(commands.is_empty());
        assert_eq!(coordinator.last_center(), Some(BEIJING));
    }

    #[test]
    fn test_short_path_clears_overlays() {
        let mut coordinator = MapCoordinator::default();
        let commands = coordinator.handle_event(MapEvent::PathChanged(snapshot(vec![BEIJING], 1)));
        assert_eq!(
            commands,
            vec![RenderCommand::ReplaceOverlays {
                polyline: None,
                closed: false
            }]
        );
    }

    #[test]
    fn test_path_is_converted_before_drawing() {
        let mut coordinator = MapCoordinator::default();
        let points = vec![BEIJING, point(39.9050, 116.4090)];
        let commands =
            coordinator.handle_event(MapEvent::PathChanged(snapshot(points.clone(), 2)));

        assert_eq!(
            commands,
            vec![RenderCommand::ReplaceOverlays {
                polyline: Some(transform::convert_all(&points)),
                closed: false
            }]
        );
    }

    #[test]
    fn test_identity_converter_draws_raw_points() {
        let mut coordinator = MapCoordinator::new(Arc::new(Identity));
        let points = vec![BEIJING, point(39.9050, 116.4090)];
        let commands =
            coordinator.handle_event(MapEvent::PathChanged(snapshot(points.clone(), 2)));

        assert_eq!(
            commands,
            vec![RenderCommand::ReplaceOverlays {
                polyline: Some(points),
                closed: false
            }]
        );
    }

    #[test]
    fn test_same_version_is_not_redrawn() {
        let mut coordinator = MapCoordinator::default();
        let points = vec![BEIJING, point(39.9050, 116.4090)];

        assert_eq!(
            coordinator
                .handle_event(MapEvent::PathChanged(snapshot(points.clone(), 2)))
                .len(),
            1
        );
        assert!(coordinator
            .handle_event(MapEvent::PathChanged(snapshot(points.clone(), 2)))
            .is_empty());

        // Closing the same path is a new version.
        let mut closed = snapshot(points, 2);
        closed.closed = true;
        let commands = coordinator.handle_event(MapEvent::PathChanged(closed));
        assert!(matches!(
            commands.as_slice(),
            [RenderCommand::ReplaceOverlays { closed: true, .. }]
        ));
    }

    #[test]
    fn test_custom_initial_span() {
        let mut coordinator = MapCoordinator::new(Arc::new(Identity)).with_initial_span_m(250.0);
        let commands = coordinator.handle_event(MapEvent::UserLocationUpdated(BEIJING));
        assert_eq!(
            commands,
            vec![RenderCommand::CenterOn {
                center: BEIJING,
                span_m: 250.0
            }]
        );
    }

    #[tokio::test]
    async fn test_run_loop_and_forwarder() {
        let tracker = Arc::new(PathTracker::new(Arc::new(
            AuthorizationStatus::AuthorizedWhenInUse,
        )));
        tracker.start().unwrap();

        let (event_tx, event_rx) = mpsc::channel(16);
        let (command_tx, mut command_rx) = mpsc::channel(16);
        let cancellation = CancellationToken::new();

        let coordinator = tokio::spawn(MapCoordinator::default().run(
            event_rx,
            command_tx,
            cancellation.clone(),
        ));
        let forwarder =
            forward_path_changes(Arc::clone(&tracker), event_tx.clone(), cancellation.clone());

        event_tx
            .send(MapEvent::UserLocationUpdated(BEIJING))
            .await
            .unwrap();
        let first = command_rx.recv().await.unwrap();
        assert!(matches!(first, RenderCommand::CenterOn { .. }));

        tracker.admit(BEIJING).unwrap();
        let second = command_rx.recv().await.unwrap();
        assert_eq!(
            second,
            RenderCommand::ReplaceOverlays {
                polyline: None,
                closed: false
            }
        );

        tracker.admit(point(39.9060, 116.4100)).unwrap();
        let third = command_rx.recv().await.unwrap();
        match third {
            RenderCommand::ReplaceOverlays {
                polyline: Some(line),
                ..
            } => assert_eq!(line.len(), 2),
            other => panic!("Expected a polyline, got {:?}", other),
        }

        cancellation.cancel();
        forwarder.await.unwrap();
        let coordinator = coordinator.await.unwrap();
        assert!(coordinator.has_centered());
    }
}
