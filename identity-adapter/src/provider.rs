use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Capability set the session core consumes from the OIDC identity provider.
///
/// Implementations wrap a concrete OIDC client library; the trait keeps the
/// session core independent of (and testable without) that library. All
/// methods that hit the network are async; the token accessors are pure reads
/// of the client's current state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Load the discovery document and attempt a silent sign-in from
    /// persisted tokens. `Ok(true)` means a usable session was restored.
    async fn load_discovery_and_try_login(&self) -> Result<bool>;

    /// Start the interactive login redirect flow.
    async fn init_login_redirect(&self) -> Result<()>;

    /// Exchange the persisted refresh token for a new access token.
    /// `Ok(false)` means the provider answered but declined the renewal.
    async fn refresh(&self) -> Result<bool>;

    /// Provider-side logout (end-session endpoint / redirect).
    async fn logout(&self) -> Result<()>;

    fn access_token(&self) -> Option<String>;

    fn has_valid_access_token(&self) -> bool;

    fn refresh_token(&self) -> Option<String>;

    /// Identity claims as reported by the provider (id-token projection).
    fn identity_claims(&self) -> Map<String, Value>;
}
