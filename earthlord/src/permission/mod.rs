//! Location permission oracle.
//!
//! The platform owns the permission prompt. This module only models the
//! answer so the path tracker can refuse to start without it.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

/// Location authorization state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    #[default]
    NotDetermined,
    /// Location access is blocked by policy (parental controls, MDM).
    Restricted,
    /// The user refused location access.
    Denied,
    /// Access granted while the app is in use.
    AuthorizedWhenInUse,
    /// Access granted at all times.
    AuthorizedAlways,
}

impl AuthorizationStatus {
    /// Whether location updates may be used.
    pub fn is_authorized(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways
        )
    }

    /// Whether the user (or policy) has refused access.
    ///
    /// `NotDetermined` is neither authorized nor denied.
    pub fn is_denied(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted
        )
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuthorizationStatus::NotDetermined => "not determined",
            AuthorizationStatus::Restricted => "restricted",
            AuthorizationStatus::Denied => "denied",
            AuthorizationStatus::AuthorizedWhenInUse => "authorized when in use",
            AuthorizationStatus::AuthorizedAlways => "authorized always",
        };
        f.write_str(name)
    }
}

/// Capability check consulted before tracking starts.
pub trait LocationAuthorization: Send + Sync {
    /// Current authorization status.
    fn status(&self) -> AuthorizationStatus;

    /// Whether location updates may be used right now.
    fn is_authorized(&self) -> bool {
        self.status().is_authorized()
    }
}

/// Authorization holder shared between the platform callback and the tracker.
///
/// Cheap to clone; all clones observe the same status.
#[derive(Debug, Clone, Default)]
pub struct SharedAuthorization {
    status: Arc<RwLock<AuthorizationStatus>>,
}

impl SharedAuthorization {
    /// Create a holder with an initial status.
    pub fn new(status: AuthorizationStatus) -> Self {
        Self {
            status: Arc::new(RwLock::new(status)),
        }
    }

    /// Record a status change reported by the platform.
    pub fn set_status(&self, status: AuthorizationStatus) {
        let previous = std::mem::replace(&mut *self.status.write(), status);
        if previous != status {
            info!(from = %previous, to = %status, "Location authorization changed");
        }
    }
}

impl LocationAuthorization for SharedAuthorization {
    fn status(&self) -> AuthorizationStatus {
        *self.status.read()
    }
}

impl LocationAuthorization for AuthorizationStatus {
    fn status(&self) -> AuthorizationStatus {
        *self
    }
}
