//! Identity-provider integration boundary for the CarePortal front end
//!
//! The portal consumes its OIDC identity provider as an opaque service. This
//! crate defines that boundary:
//!
//! - [`IdentityProvider`]: the narrow capability set the session core needs
//!   (discovery/login, refresh, logout, token accessors). Implementations
//!   wrap a concrete OIDC client; the session core never sees protocol
//!   mechanics.
//! - [`SessionStore`]: the persisted key-value store the provider writes its
//!   token artifacts into, plus the pattern matcher used to wipe those
//!   artifacts on logout.
//! - [`OidcConfig`]: the static provider settings (issuer, realm, client id,
//!   scope).

pub mod config;
pub mod error;
pub mod provider;
pub mod storage;

pub use config::*;
pub use error::*;
pub use provider::*;
pub use storage::*;
