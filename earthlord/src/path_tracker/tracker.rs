//! The path tracker: lifecycle, fix intake and admission.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::config::PathTrackerConfig;
use super::error::TrackerError;
use super::session::{Fix, PathSnapshot, PathVersion, TickOutcome, TrackingSession, TrackingState};
use crate::coord::{distance_meters, GeoPoint};
use crate::permission::LocationAuthorization;

/// Samples a stream of location fixes into a sparse, ordered path.
///
/// All state lives behind one mutex that every operation holds only for a
/// state check and a value copy. Consequences:
///
/// - `submit_fix` racing `tick` is last-write-wins; a `GeoPoint` is never torn
/// - `current_path` never observes a partial append
/// - `tick` re-checks the lifecycle state under the lock, so no append can
///   land after `stop` or `clear` has returned
///
/// Share between tasks with `Arc<PathTracker>`.
pub struct PathTracker {
    config: PathTrackerConfig,
    authorization: Arc<dyn LocationAuthorization>,
    session: Mutex<TrackingSession>,
    version_tx: watch::Sender<PathVersion>,
}

impl std::fmt::Debug for PathTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathTracker")
            .field("config", &self.config)
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

impl PathTracker {
    /// Create an idle tracker with default configuration.
    pub fn new(authorization: Arc<dyn LocationAuthorization>) -> Self {
        Self::with_config(PathTrackerConfig::default(), authorization)
    }

    /// Create an idle tracker with custom configuration.
    pub fn with_config(
        config: PathTrackerConfig,
        authorization: Arc<dyn LocationAuthorization>,
    ) -> Self {
        let (version_tx, _) = watch::channel(PathVersion::default());
        Self {
            config,
            authorization,
            session: Mutex::new(TrackingSession::default()),
            version_tx,
        }
    }

    /// Tracker configuration.
    pub fn config(&self) -> &PathTrackerConfig {
        &self.config
    }

    /// Begin a new tracking session.
    ///
    /// Fails with [`TrackerError::NotAuthorized`] and leaves the tracker
    /// untouched when location permission is missing. On success the
    /// previous path is discarded.
    pub fn start(&self) -> Result<(), TrackerError> {
        let status = self.authorization.status();
        if !status.is_authorized() {
            warn!(%status, "Path tracking refused: location not authorized");
            return Err(TrackerError::NotAuthorized(status));
        }

        let mut session = self.session.lock();
        session.reset_path();
        session.state = TrackingState::Tracking;
        // The last known location may serve as the anchor of the new path.
        session.consumed_seq = None;
        self.version_tx.send_replace(session.version());

        info!("Path tracking started");
        Ok(())
    }

    /// End the tracking session, keeping the accumulated path.
    pub fn stop(&self) {
        let mut session = self.session.lock();
        session.state = TrackingState::Idle;
        info!(points = session.path.len(), "Path tracking stopped");
    }

    /// Empty the path and reset revision and closure.
    ///
    /// Valid in either state; the lifecycle state is unchanged.
    pub fn clear(&self) {
        let mut session = self.session.lock();
        session.reset_path();
        self.version_tx.send_replace(session.version());
        info!("Path cleared");
    }

    /// Record the most recent fix from the location source.
    ///
    /// Does not touch the path; the next [`tick`](Self::tick) consumes it.
    /// Fixes with invalid coordinates are rejected and leave the previous
    /// fix in place.
    pub fn submit_fix(&self, fix: Fix) -> Result<(), TrackerError> {
        fix.point.validate()?;
        self.session.lock().record_fix(fix);
        Ok(())
    }

    /// Run one admission tick.
    ///
    /// The first point of a session is accepted unconditionally. Every later
    /// fix is appended only when it lies strictly farther than the minimum
    /// spacing from the last accepted point.
    pub fn tick(&self) -> TickOutcome {
        let mut session = self.session.lock();

        if session.state != TrackingState::Tracking {
            return TickOutcome::NotTracking;
        }

        let Some(fix) = session.take_unconsumed_fix() else {
            return TickOutcome::NoNewFix;
        };
        let candidate = fix.point;

        let outcome = match session.path.last() {
            None => TickOutcome::Anchored(candidate),
            Some(last) => {
                let distance_m = distance_meters(last, &candidate);
                if distance_m > self.config.min_spacing_m {
                    TickOutcome::Appended {
                        point: candidate,
                        distance_m,
                    }
                } else {
                    TickOutcome::TooClose { distance_m }
                }
            }
        };

        match outcome {
            TickOutcome::Anchored(point) => {
                session.path.push(point);
                session.revision += 1;
                debug!(%point, "Recorded path anchor");
            }
            TickOutcome::Appended { point, distance_m } => {
                session.path.push(point);
                session.revision += 1;
                debug!(%point, distance_m, revision = session.revision, "Recorded path point");
            }
            TickOutcome::TooClose { distance_m } => {
                debug!(distance_m, "Fix too close to last point, skipped");
            }
            TickOutcome::NotTracking | TickOutcome::NoNewFix => {}
        }

        if outcome.is_accepted() {
            self.version_tx.send_replace(session.version());
        }
        outcome
    }

    /// Mark the path closed if its endpoint has returned to the anchor.
    ///
    /// Requires at least `closure_min_points` points and an endpoint within
    /// `closure_threshold_m` of the anchor. Returns the closed flag after the
    /// check. Once closed, the path stays closed until `start` or `clear`.
    pub fn check_closure(&self) -> bool {
        let mut session = self.session.lock();
        if session.closed {
            return true;
        }
        if session.path.len() < self.config.closure_min_points.max(2) {
            return false;
        }

        let (Some(first), Some(last)) = (session.path.first(), session.path.last()) else {
            return false;
        };
        let gap_m = distance_meters(first, last);
        if gap_m > self.config.closure_threshold_m {
            return false;
        }

        session.closed = true;
        self.version_tx.send_replace(session.version());
        info!(points = session.path.len(), gap_m, "Path closed");
        true
    }

    /// Force the closed flag, for callers with their own closure rule.
    pub fn mark_closed(&self) {
        let mut session = self.session.lock();
        if !session.closed {
            session.closed = true;
            self.version_tx.send_replace(session.version());
            info!(points = session.path.len(), "Path marked closed");
        }
    }

    /// Consistent copy of the current path and its metadata.
    pub fn current_path(&self) -> PathSnapshot {
        self.session.lock().snapshot()
    }

    /// Number of accepted appends since the last start or clear.
    pub fn revision(&self) -> u64 {
        self.session.lock().revision
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackingState {
        self.session.lock().state
    }

    /// Whether the session is admitting samples.
    pub fn is_tracking(&self) -> bool {
        self.state() == TrackingState::Tracking
    }

    /// Whether the path has been judged a closed loop.
    pub fn is_closed(&self) -> bool {
        self.session.lock().closed
    }

    /// Most recent fix submitted, consumed or not.
    pub fn latest_fix(&self) -> Option<Fix> {
        self.session.lock().latest_fix.map(|(_, fix)| fix)
    }

    /// Subscribe to path version changes.
    ///
    /// The receiver starts at the current version and is notified on every
    /// accepted append, closure, start and clear.
    pub fn subscribe(&self) -> watch::Receiver<PathVersion> {
        self.version_tx.subscribe()
    }

    /// Submit a fix at `point` stamped now, then run one tick.
    ///
    /// Used by replay tools that feed one recorded fix per sample interval.
    pub fn admit(&self, point: GeoPoint) -> Result<TickOutcome, TrackerError> {
        self.submit_fix(Fix::now(point))?;
        Ok(self.tick())
    }
}
