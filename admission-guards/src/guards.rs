use session_manager::SessionManager;
use std::sync::Arc;
use tracing::debug;

/// Redirect target when no session is held.
pub const PUBLIC_ROOT: &str = "/";

/// Redirect target for authenticated users lacking a section role.
pub const AUTHENTICATED_LANDING: &str = "/home";

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Denied { redirect_to: String },
}

impl GuardDecision {
    #[must_use]
    pub fn denied(redirect_to: &str) -> Self {
        Self::Denied {
            redirect_to: redirect_to.to_string(),
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Gates protected routes on session validity.
pub struct AuthGuard {
    session: Arc<SessionManager>,
}

impl AuthGuard {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Allow when a valid token is held, either already or after one
    /// reactive refresh; deny to the public root otherwise.
    pub async fn check(&self) -> GuardDecision {
        if !self.session.is_authenticated() {
            if let Err(err) = self.session.refresh().await {
                debug!(error = %err, "reactive refresh during navigation failed");
            }
        }
        if self.session.is_authenticated() {
            GuardDecision::Allowed
        } else {
            debug!("navigation denied: no valid session");
            GuardDecision::denied(PUBLIC_ROOT)
        }
    }
}

/// Gates role-restricted sections. Composes [`AuthGuard`], then requires the
/// configured role claim.
pub struct RoleGuard {
    auth: AuthGuard,
    session: Arc<SessionManager>,
    required_role: String,
}

impl RoleGuard {
    #[must_use]
    pub fn new(session: Arc<SessionManager>, required_role: impl Into<String>) -> Self {
        Self {
            auth: AuthGuard::new(session.clone()),
            session,
            required_role: required_role.into(),
        }
    }

    pub async fn check(&self) -> GuardDecision {
        match self.auth.check().await {
            GuardDecision::Allowed => {
                if self.session.has_role(&self.required_role) {
                    GuardDecision::Allowed
                } else {
                    debug!(role = %self.required_role, "authenticated but lacking section role");
                    GuardDecision::denied(AUTHENTICATED_LANDING)
                }
            }
            denied => denied,
        }
    }
}
