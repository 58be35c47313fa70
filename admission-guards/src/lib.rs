//! Navigation admission guards for the CarePortal front end
//!
//! Guards gate route transitions on session state. They never error past the
//! navigation boundary: every check resolves to [`GuardDecision::Allowed`]
//! or a redirect.
//!
//! - [`AuthGuard`]: requires a valid session, attempting one reactive token
//!   refresh first (covers the page-reload / deep-link race where bootstrap
//!   has not finished). Denies to the public root.
//! - [`RoleGuard`]: composes the authentication check and additionally
//!   requires a role claim. An authenticated user lacking the role is sent
//!   to the authenticated landing page, not back to the public root.

pub mod guards;

pub use guards::*;
