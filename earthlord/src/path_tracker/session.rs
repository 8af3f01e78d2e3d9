//! Tracking session state and the values it publishes.

use std::time::SystemTime;

use serde::Serialize;

use crate::coord::GeoPoint;

/// Lifecycle state of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrackingState {
    /// Not admitting samples. The path is retained for inspection.
    #[default]
    Idle,
    /// Admitting samples on every tick.
    Tracking,
}

/// A raw location fix from the platform location source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    /// WGS-84 position.
    pub point: GeoPoint,
    /// When the platform measured the position.
    pub timestamp: SystemTime,
    /// Reported horizontal accuracy radius in meters, if known.
    ///
    /// Carried for consumers; admission does not filter on it.
    pub horizontal_accuracy_m: Option<f64>,
}

impl Fix {
    /// Create a fix stamped with the current time.
    pub fn now(point: GeoPoint) -> Self {
        Self::at(point, SystemTime::now())
    }

    /// Create a fix with an explicit timestamp.
    pub fn at(point: GeoPoint, timestamp: SystemTime) -> Self {
        Self {
            point,
            timestamp,
            horizontal_accuracy_m: None,
        }
    }

    /// Attach a horizontal accuracy radius.
    pub fn with_accuracy_m(mut self, accuracy_m: f64) -> Self {
        self.horizontal_accuracy_m = Some(accuracy_m);
        self
    }
}

/// Change marker published on every observable path mutation.
///
/// Consumers compare versions instead of comparing paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PathVersion {
    /// Number of accepted appends since the last start or clear.
    pub revision: u64,
    /// Whether the path has been judged a closed loop.
    pub closed: bool,
}

/// Consistent copy of the session at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PathSnapshot {
    /// Accepted points in traversal order (WGS-84).
    pub points: Vec<GeoPoint>,
    /// Number of accepted appends since the last start or clear.
    pub revision: u64,
    /// Whether the path has been judged a closed loop.
    pub closed: bool,
    /// Lifecycle state when the snapshot was taken.
    pub state: TrackingState,
}

impl PathSnapshot {
    /// Number of points in the path.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The change marker of this snapshot.
    pub fn version(&self) -> PathVersion {
        PathVersion {
            revision: self.revision,
            closed: self.closed,
        }
    }
}

/// Result of a single admission tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The session is idle; nothing was considered.
    NotTracking,
    /// No fix arrived since the previous tick.
    NoNewFix,
    /// The path was empty and the fix became its anchor.
    Anchored(GeoPoint),
    /// The fix was far enough from the last point and was appended.
    Appended {
        /// Appended point.
        point: GeoPoint,
        /// Distance from the previous point in meters.
        distance_m: f64,
    },
    /// The fix was too close to the last point and was dropped.
    TooClose {
        /// Distance from the previous point in meters.
        distance_m: f64,
    },
}

impl TickOutcome {
    /// Whether the tick grew the path.
    pub fn is_accepted(&self) -> bool {
        matches!(self, TickOutcome::Anchored(_) | TickOutcome::Appended { .. })
    }
}

/// Mutable session state. Always accessed under the tracker's lock.
#[derive(Debug, Default)]
pub(super) struct TrackingSession {
    pub(super) state: TrackingState,
    pub(super) path: Vec<GeoPoint>,
    pub(super) revision: u64,
    pub(super) closed: bool,
    /// Most recent fix and its submission sequence number.
    pub(super) latest_fix: Option<(u64, Fix)>,
    /// Sequence number of the last fix consumed by a tick.
    pub(super) consumed_seq: Option<u64>,
    pub(super) next_seq: u64,
}

impl TrackingSession {
    /// Reset path, revision and closure. Lifecycle state is untouched.
    pub(super) fn reset_path(&mut self) {
        self.path.clear();
        self.revision = 0;
        self.closed = false;
    }

    /// Record a fix, replacing any earlier one.
    pub(super) fn record_fix(&mut self, fix: Fix) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_fix = Some((seq, fix));
    }

    /// Take the latest fix if no tick has consumed it yet.
    pub(super) fn take_unconsumed_fix(&mut self) -> Option<Fix> {
        let (seq, fix) = self.latest_fix?;
        if self.consumed_seq == Some(seq) {
            return None;
        }
        self.consumed_seq = Some(seq);
        Some(fix)
    }

    pub(super) fn version(&self) -> PathVersion {
        PathVersion {
            revision: self.revision,
            closed: self.closed,
        }
    }

    pub(super) fn snapshot(&self) -> PathSnapshot {
        PathSnapshot {
            points: self.path.clone(),
            revision: self.revision,
            closed: self.closed,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new_unchecked(lat, lon)
    }

    #[test]
    fn test_fix_consumed_once() {
        let mut session = TrackingSession::default();
        assert!(session.take_unconsumed_fix().is_none());

        session.record_fix(Fix::now(point(1.0, 2.0)));
        assert!(session.take_unconsumed_fix().is_some());
        assert!(session.take_unconsumed_fix().is_none());
    }

    #[test]
    fn test_latest_fix_wins() {
        let mut session = TrackingSession::default();
        session.record_fix(Fix::now(point(1.0, 1.0)));
        session.record_fix(Fix::now(point(2.0, 2.0)));

        let fix = session.take_unconsumed_fix().unwrap();
        assert_eq!(fix.point, point(2.0, 2.0));
    }

    #[test]
    fn test_reset_path_keeps_state() {
        let mut session = TrackingSession {
            state: TrackingState::Tracking,
            path: vec![point(0.0, 0.0)],
            revision: 1,
            closed: true,
            ..Default::default()
        };
        session.reset_path();

        assert_eq!(session.state, TrackingState::Tracking);
        assert!(session.path.is_empty());
        assert_eq!(session.revision, 0);
        assert!(!session.closed);
    }

    #[test]
    fn test_tick_outcome_is_accepted() {
        assert!(TickOutcome::Anchored(point(0.0, 0.0)).is_accepted());
        assert!(TickOutcome::Appended {
            point: point(0.0, 0.0),
            distance_m: 12.0
        }
        .is_accepted());
        assert!(!TickOutcome::TooClose { distance_m: 3.0 }.is_accepted());
        assert!(!TickOutcome::NoNewFix.is_accepted());
        assert!(!TickOutcome::NotTracking.is_accepted());
    }
}
