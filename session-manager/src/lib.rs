//! Session and token-lifecycle management for the CarePortal front end
//!
//! This crate owns the authenticated session against the hospital's identity
//! provider:
//!
//! - Silent bootstrap from persisted tokens at application start
//! - Single-flight token refresh: any number of concurrent callers (request
//!   interceptor, background timer, admission guards) share one network call
//!   to the provider and observe the same settlement
//! - A cancellable background renewal task
//! - Logout that leaves storage and timers consistent, wiping every
//!   persisted token artifact by key pattern
//! - Claim decoding and role checks over the current access token
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use session_manager::{SessionConfig, SessionManager};
//!
//! # async fn shell(provider: Arc<dyn identity_adapter::IdentityProvider>,
//! #                store: Arc<dyn identity_adapter::SessionStore>) {
//! let session = Arc::new(SessionManager::new(provider, store, SessionConfig::default()));
//! if session.bootstrap().await {
//!     session.start_background_renewal();
//! }
//! # }
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod manager;
pub mod session;

pub use config::*;
pub use error::*;
pub use manager::*;
pub use session::*;
