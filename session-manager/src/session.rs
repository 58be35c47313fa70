use serde::{Deserialize, Serialize};

/// Lifecycle state of the portal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No usable session; protected navigation is denied.
    Unauthenticated,
    /// A valid access token is held.
    Authenticated,
    /// A renewal call to the identity provider is outstanding.
    RefreshInFlight,
    /// The last renewal settled as a failure; cleanup is about to run.
    Expired,
}

/// Snapshot of the session owned by the session manager.
///
/// The access token is replaced as a single assignment under the state lock;
/// readers see either the previous token or the fully committed new one,
/// never an intermediate value. Claims are never stored here — they are
/// decoded on demand from `access_token` so they cannot go stale.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    pub access_token: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            access_token: None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::unauthenticated()
    }
}
