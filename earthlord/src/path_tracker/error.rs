//! Path tracker errors.

use thiserror::Error;

use crate::coord::CoordError;
use crate::permission::AuthorizationStatus;

/// Errors returned by [`PathTracker`](super::PathTracker) operations.
///
/// Both variants are recoverable: the caller re-prompts for permission or
/// drops the bad fix.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TrackerError {
    /// Tracking was requested without location permission.
    #[error("Location access not authorized ({0})")]
    NotAuthorized(AuthorizationStatus),

    /// A fix carried an out-of-range or non-finite coordinate.
    #[error("Invalid point: {0}")]
    InvalidPoint(#[from] CoordError),
}
