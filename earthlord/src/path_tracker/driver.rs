//! Async driver feeding a [`PathTracker`] from a location channel and a timer.
//!
//! # Architecture
//!
//! ```text
//! Location source ──mpsc<Fix>──► ┌──────────────────┐
//!                                │ PathTrackerDriver │──► submit_fix()
//! tokio interval ──────────────► │   (select loop)   │──► tick()
//!                                └──────────────────┘
//! ```
//!
//! Fixes arriving faster than the sample interval coalesce: only the latest
//! one is seen by the next tick.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::session::Fix;
use super::tracker::PathTracker;

/// Counters reported when the driver exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Fixes received from the channel.
    pub fixes_received: u64,
    /// Fixes rejected as invalid.
    pub fixes_rejected: u64,
    /// Admission ticks run.
    pub ticks: u64,
    /// Ticks that grew the path.
    pub accepted: u64,
}

/// Runs the admission timer and fix intake for one tracker.
pub struct PathTrackerDriver;

impl PathTrackerDriver {
    /// Spawn the driver on the current tokio runtime.
    ///
    /// The task ends when `cancellation` fires or the fix channel closes.
    pub fn spawn(
        tracker: Arc<PathTracker>,
        fixes: mpsc::Receiver<Fix>,
        cancellation: CancellationToken,
    ) -> JoinHandle<DriverStats> {
        tokio::spawn(Self::run(tracker, fixes, cancellation))
    }

    /// Drive the tracker until cancelled or the fix channel closes.
    pub async fn run(
        tracker: Arc<PathTracker>,
        mut fixes: mpsc::Receiver<Fix>,
        cancellation: CancellationToken,
    ) -> DriverStats {
        let period = tracker.config().sample_interval;
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; admission starts one period in.
        interval.tick().await;

        info!(?period, "Path tracker driver started");
        let mut stats = DriverStats::default();

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => break,

                _ = interval.tick() => {
                    stats.ticks += 1;
                    if tracker.tick().is_accepted() {
                        stats.accepted += 1;
                    }
                }

                fix_opt = fixes.recv() => {
                    let Some(fix) = fix_opt else {
                        debug!("Fix channel closed");
                        break;
                    };
                    stats.fixes_received += 1;
                    if let Err(e) = tracker.submit_fix(fix) {
                        stats.fixes_rejected += 1;
                        warn!(error = %e, "Dropped location fix");
                    }
                }
            }
        }

        info!(
            ticks = stats.ticks,
            accepted = stats.accepted,
            fixes = stats.fixes_received,
            "Path tracker driver stopped"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::coord::GeoPoint;
    use crate::path_tracker::PathTrackerConfig;
    use crate::permission::AuthorizationStatus;

    fn fix(lat: f64, lon: f64) -> Fix {
        Fix::now(GeoPoint::new_unchecked(lat, lon))
    }

    fn tracker() -> Arc<PathTracker> {
        Arc::new(PathTracker::with_config(
            PathTrackerConfig::default(),
            Arc::new(AuthorizationStatus::AuthorizedWhenInUse),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_admits_on_cadence() {
        let tracker = tracker();
        tracker.start().unwrap();
        let (tx, rx) = mpsc::channel(16);
        let cancellation = CancellationToken::new();
        let handle = PathTrackerDriver::spawn(Arc::clone(&tracker), rx, cancellation.clone());

        tx.send(fix(0.0, 0.0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(tracker.revision(), 1);

        tx.send(fix(0.0, 0.00005)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(tracker.revision(), 1);

        tx.send(fix(0.0, 0.0003)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(tracker.revision(), 2);

        cancellation.cancel();
        let stats = handle.await.unwrap();
        assert_eq!(stats.fixes_received, 3);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_coalesces_fast_fixes() {
        let tracker = tracker();
        tracker.start().unwrap();
        let (tx, rx) = mpsc::channel(16);
        let handle = PathTrackerDriver::spawn(Arc::clone(&tracker), rx, CancellationToken::new());

        for i in 0..5 {
            tx.send(fix(0.0, i as f64 * 0.001)).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let snapshot = tracker.current_path();
        assert_eq!(snapshot.points, vec![GeoPoint::new_unchecked(0.0, 0.004)]);

        drop(tx);
        let stats = handle.await.unwrap();
        assert_eq!(stats.fixes_received, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_counts_rejected_fixes() {
        let tracker = tracker();
        tracker.start().unwrap();
        let (tx, rx) = mpsc::channel(4);
        let handle = PathTrackerDriver::spawn(Arc::clone(&tracker), rx, CancellationToken::new());

        tx.send(fix(95.0, 0.0)).await.unwrap();
        drop(tx);

        let stats = handle.await.unwrap();
        assert_eq!(stats.fixes_rejected, 1);
        assert!(tracker.current_path().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_admission_under_driver() {
        let tracker = tracker();
        tracker.start().unwrap();
        let (tx, rx) = mpsc::channel(4);
        let cancellation = CancellationToken::new();
        let handle = PathTrackerDriver::spawn(Arc::clone(&tracker), rx, cancellation.clone());

        tx.send(fix(0.0, 0.0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;
        tracker.stop();

        tx.send(fix(0.0, 0.01)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(tracker.current_path().len(), 1);

        cancellation.cancel();
        handle.await.unwrap();
    }
}
