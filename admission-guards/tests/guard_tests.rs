//! Guard decisions: reactive refresh on deep links, public-root denial on
//! lost sessions, and role-based section gating.

use admission_guards::{AuthGuard, GuardDecision, RoleGuard, AUTHENTICATED_LANDING, PUBLIC_ROOT};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use identity_adapter::{IdentityError, IdentityProvider, InMemorySessionStore};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use session_manager::{SessionConfig, SessionManager};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

struct FakeProvider {
    refresh_calls: AtomicUsize,
    refresh_succeeds: AtomicBool,
    access_token: Mutex<Option<String>>,
    refresh_token: Mutex<Option<String>>,
    valid: AtomicBool,
}

impl FakeProvider {
    fn valid_with_token(token: &str) -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            refresh_succeeds: AtomicBool::new(true),
            access_token: Mutex::new(Some(token.to_string())),
            refresh_token: Mutex::new(Some("rt-1".to_string())),
            valid: AtomicBool::new(true),
        }
    }

    fn expired() -> Self {
        let provider = Self::valid_with_token("stale");
        provider.valid.store(false, Ordering::SeqCst);
        provider
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn load_discovery_and_try_login(&self) -> identity_adapter::Result<bool> {
        Ok(self.valid.load(Ordering::SeqCst))
    }

    async fn init_login_redirect(&self) -> identity_adapter::Result<()> {
        Ok(())
    }

    async fn refresh(&self) -> identity_adapter::Result<bool> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.refresh_succeeds.load(Ordering::SeqCst) {
            *self.access_token.lock() = Some("renewed-token".to_string());
            self.valid.store(true, Ordering::SeqCst);
            Ok(true)
        } else {
            Err(IdentityError::RefreshRejected("invalid_grant".to_string()))
        }
    }

    async fn logout(&self) -> identity_adapter::Result<()> {
        self.valid.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn access_token(&self) -> Option<String> {
        self.access_token.lock().clone()
    }

    fn has_valid_access_token(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh_token.lock().clone()
    }

    fn identity_claims(&self) -> Map<String, Value> {
        Map::new()
    }
}

fn session_with(provider: Arc<FakeProvider>) -> Arc<SessionManager> {
    Arc::new(SessionManager::new(
        provider,
        Arc::new(InMemorySessionStore::new()),
        SessionConfig::default(),
    ))
}

fn jwt_with_roles(roles: &[&str]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = json!({ "sub": "user-1", "roles": roles });
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{header}.{body}.sig")
}

#[tokio::test]
async fn authenticated_navigation_is_allowed_without_refresh() {
    let provider = Arc::new(FakeProvider::valid_with_token("t1"));
    let guard = AuthGuard::new(session_with(provider.clone()));

    assert_eq!(guard.check().await, GuardDecision::Allowed);
    assert_eq!(provider.refresh_calls(), 0);
}

#[tokio::test]
async fn deep_link_before_bootstrap_recovers_via_refresh() {
    let provider = Arc::new(FakeProvider::expired());
    let guard = AuthGuard::new(session_with(provider.clone()));

    assert_eq!(guard.check().await, GuardDecision::Allowed);
    assert_eq!(provider.refresh_calls(), 1);
}

#[tokio::test]
async fn lost_session_is_denied_to_public_root() {
    let provider = Arc::new(FakeProvider::expired());
    provider.refresh_succeeds.store(false, Ordering::SeqCst);
    let guard = AuthGuard::new(session_with(provider.clone()));

    assert_eq!(guard.check().await, GuardDecision::denied(PUBLIC_ROOT));
    assert_eq!(provider.refresh_calls(), 1);
}

#[tokio::test]
async fn never_logged_in_is_denied_without_a_network_call() {
    let provider = Arc::new(FakeProvider::expired());
    *provider.refresh_token.lock() = None;
    let guard = AuthGuard::new(session_with(provider.clone()));

    assert_eq!(guard.check().await, GuardDecision::denied(PUBLIC_ROOT));
    assert_eq!(provider.refresh_calls(), 0);
}

#[tokio::test]
async fn patient_is_kept_out_of_admin_sections_but_stays_signed_in() {
    let token = jwt_with_roles(&["ROLE_PATIENT"]);
    let provider = Arc::new(FakeProvider::valid_with_token(&token));
    let session = session_with(provider);
    assert!(session.bootstrap().await);

    // The base check passes: the user is authenticated
    assert_eq!(AuthGuard::new(session.clone()).check().await, GuardDecision::Allowed);

    // The role check sends them to the landing page, not the public root
    let admin_guard = RoleGuard::new(session.clone(), "ROLE_ADMIN");
    assert_eq!(
        admin_guard.check().await,
        GuardDecision::denied(AUTHENTICATED_LANDING)
    );

    let patient_guard = RoleGuard::new(session, "ROLE_PATIENT");
    assert_eq!(patient_guard.check().await, GuardDecision::Allowed);
}

#[tokio::test]
async fn role_guard_propagates_the_authentication_denial() {
    let provider = Arc::new(FakeProvider::expired());
    provider.refresh_succeeds.store(false, Ordering::SeqCst);
    let guard = RoleGuard::new(session_with(provider), "ROLE_ADMIN");

    // Unauthenticated users go to the public root, not the landing page
    assert_eq!(guard.check().await, GuardDecision::denied(PUBLIC_ROOT));
}
