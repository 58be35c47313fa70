use crate::claims;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::session::{SessionState, SessionStatus};
use identity_adapter::{is_session_artifact, IdentityProvider, SessionStore};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Settlement of a refresh, broadcast to every caller that joined it.
type RefreshSettlement = Option<Result<()>>;

enum FlightRole {
    Lead(watch::Sender<RefreshSettlement>),
    Join(watch::Receiver<RefreshSettlement>),
}

/// Releases the in-flight slot when the leader finishes — or is cancelled.
///
/// The background renewal task can lead a refresh and be aborted mid-call
/// (logout and teardown cancel it), which drops the leader future at its
/// suspension point. Without this guard the slot would keep a receiver whose
/// sender is gone, and every later caller would join a settlement that never
/// comes.
struct InFlightGuard<'a> {
    manager: &'a SessionManager,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.manager.inflight.lock() = None;
        let mut state = self.manager.state.write();
        if state.status == SessionStatus::RefreshInFlight {
            // Cancelled before settlement: fall back to what the snapshot
            // still supports instead of reporting a refresh that is not
            // happening.
            state.status = if state.access_token.is_some() {
                SessionStatus::Authenticated
            } else {
                SessionStatus::Unauthenticated
            };
        }
    }
}

/// Owner of the portal session.
///
/// The request authorizer, the admission guards, and the background renewal
/// task are all *callers* of [`SessionManager::refresh`]; none of them
/// mutates session state directly. The in-flight slot is checked-and-set in
/// one synchronous lock scope before any await, which is what makes the
/// single-flight guarantee hold without a lock held across suspension.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
    state: RwLock<SessionState>,
    inflight: Mutex<Option<watch::Receiver<RefreshSettlement>>>,
    renewal_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn SessionStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            state: RwLock::new(SessionState::unauthenticated()),
            inflight: Mutex::new(None),
            renewal_task: Mutex::new(None),
        }
    }

    /// Load identity-provider discovery and attempt a silent sign-in from
    /// persisted tokens. Failure is non-fatal: the session simply stays
    /// unauthenticated and protected navigation will be denied.
    pub async fn bootstrap(&self) -> bool {
        match self.provider.load_discovery_and_try_login().await {
            Ok(true) if self.provider.has_valid_access_token() => {
                let token = self.provider.access_token();
                let mut state = self.state.write();
                state.access_token = token;
                state.status = SessionStatus::Authenticated;
                drop(state);
                info!("session restored from persisted tokens");
                true
            }
            Ok(_) => {
                debug!("no persisted session to restore");
                false
            }
            Err(err) => {
                warn!(error = %err, "identity discovery failed; continuing unauthenticated");
                false
            }
        }
    }

    /// Start the interactive login redirect.
    pub async fn login(&self) {
        if let Err(err) = self.provider.init_login_redirect().await {
            warn!(error = %err, "login redirect failed");
        }
    }

    /// Whether a valid (present, unexpired) access token is held. No I/O.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.provider.has_valid_access_token()
    }

    /// Current access-token snapshot.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.read().access_token.clone()
    }

    #[must_use]
    pub fn has_refresh_token(&self) -> bool {
        self.provider.refresh_token().is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.read().status
    }

    /// Renew the access token, coalescing concurrent callers.
    ///
    /// If a refresh is already in flight, the caller joins it and receives
    /// the identical settlement; otherwise the caller leads one network call
    /// to the provider. On failure the session is torn down
    /// (logout-equivalent cleanup, without the provider's logout endpoint).
    ///
    /// # Errors
    ///
    /// [`SessionError::NoRefreshToken`] when renewal is impossible (nothing
    /// touched), [`SessionError::RefreshFailed`] when the provider declined
    /// or was unreachable (session cleared).
    pub async fn refresh(&self) -> Result<()> {
        let role = {
            let mut inflight = self.inflight.lock();
            if let Some(rx) = inflight.as_ref() {
                FlightRole::Join(rx.clone())
            } else {
                if self.provider.refresh_token().is_none() {
                    return Err(SessionError::NoRefreshToken);
                }
                let (tx, rx) = watch::channel(None);
                *inflight = Some(rx);
                self.state.write().status = SessionStatus::RefreshInFlight;
                FlightRole::Lead(tx)
            }
        };

        match role {
            FlightRole::Join(mut rx) => {
                debug!("joining in-flight token refresh");
                loop {
                    if let Some(outcome) = rx.borrow_and_update().clone() {
                        return outcome;
                    }
                    if rx.changed().await.is_err() {
                        return Err(SessionError::RefreshAbandoned);
                    }
                }
            }
            FlightRole::Lead(tx) => {
                let slot = InFlightGuard { manager: self };
                let outcome = self.lead_refresh().await;
                drop(slot);
                let _ = tx.send(Some(outcome.clone()));
                outcome
            }
        }
    }

    async fn lead_refresh(&self) -> Result<()> {
        debug!("refreshing access token");
        match self.provider.refresh().await {
            Ok(true) => {
                // Re-check validity before committing: a logout that landed
                // while the call was outstanding must not be resurrected.
                match self.provider.access_token() {
                    Some(token) if self.provider.has_valid_access_token() => {
                        let mut state = self.state.write();
                        state.access_token = Some(token);
                        state.status = SessionStatus::Authenticated;
                        drop(state);
                        debug!("access token renewed");
                        Ok(())
                    }
                    _ => {
                        self.fail_session();
                        Err(SessionError::RefreshFailed(
                            "provider holds no usable token after renewal".to_string(),
                        ))
                    }
                }
            }
            Ok(false) => {
                self.fail_session();
                Err(SessionError::RefreshFailed(
                    "renewal declined by provider".to_string(),
                ))
            }
            Err(err) => {
                self.fail_session();
                Err(SessionError::RefreshFailed(err.to_string()))
            }
        }
    }

    /// Start the recurring silent-renewal task using the configured interval.
    pub fn start_background_renewal(self: &Arc<Self>) {
        self.start_background_renewal_every(self.config.renewal_interval());
    }

    /// Start the recurring silent-renewal task. A no-op when one is already
    /// running. Each tick skips silently while no refresh token is held;
    /// otherwise it goes through the same single-flight [`Self::refresh`]
    /// path as request-triggered renewals, so a tick that lands during one
    /// coalesces instead of duplicating it.
    pub fn start_background_renewal_every(self: &Arc<Self>, interval: Duration) {
        let mut task = self.renewal_task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("background renewal already running");
            return;
        }
        let manager = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval yields immediately; the first renewal belongs one
            // full interval after start
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if manager.provider.refresh_token().is_none() {
                    debug!("renewal tick skipped: no refresh token");
                    continue;
                }
                if let Err(err) = manager.refresh().await {
                    warn!(error = %err, "background renewal failed; task stopping");
                    break;
                }
            }
        });
        *task = Some(handle);
        debug!(interval_secs = interval.as_secs(), "background renewal started");
    }

    /// Cancel the renewal task. Idempotent.
    pub fn stop_background_renewal(&self) {
        if let Some(handle) = self.renewal_task.lock().take() {
            handle.abort();
            debug!("background renewal stopped");
        }
    }

    /// End the session: stop the renewal task, wipe every persisted token
    /// artifact, and delegate to the provider-side logout. Idempotent.
    pub async fn logout(&self) {
        info!("logging out");
        self.stop_background_renewal();
        self.clear_session();
        if let Err(err) = self.provider.logout().await {
            warn!(error = %err, "provider-side logout failed");
        }
    }

    /// Named claim from the current access token. Decode failures yield
    /// `None`, never an error.
    #[must_use]
    pub fn get_claim(&self, name: &str) -> Option<Value> {
        let token = self.access_token()?;
        claims::decode_claims(&token).get(name).cloned()
    }

    /// Whether the session carries the given role, read from the access
    /// token's claims first and the provider's identity claims second.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        let token_roles = self
            .access_token()
            .map(|t| claims::roles_of(&claims::decode_claims(&t)))
            .unwrap_or_default();
        if !token_roles.is_empty() {
            return token_roles.iter().any(|r| r == role);
        }
        claims::roles_of(&self.provider.identity_claims())
            .iter()
            .any(|r| r == role)
    }

    fn fail_session(&self) {
        self.state.write().status = SessionStatus::Expired;
        warn!("token refresh failed; clearing session");
        self.clear_session();
        self.stop_background_renewal();
    }

    fn clear_session(&self) {
        let removed = self.store.clear_matching(&is_session_artifact);
        if removed > 0 {
            debug!(removed, "cleared persisted session artifacts");
        }
        let mut state = self.state.write();
        state.access_token = None;
        state.status = SessionStatus::Unauthenticated;
    }
}
