//! Outbound-HTTP authorization middleware for the CarePortal front end
//!
//! Every call the domain views issue goes through [`ApiClient`]:
//!
//! - Calls not targeting the configured gateway origin pass through
//!   unmodified — no bearer token, no 401 handling.
//! - Gateway calls carry the current access token; on a 401 the client
//!   drives exactly one coordinated refresh through the session manager's
//!   single-flight path and retries the original request once. Under N
//!   simultaneous 401s exactly one refresh reaches the identity provider and
//!   every request resumes against the single renewed token.
//! - A 401 after the retry (or a failed refresh) forces logout and surfaces
//!   as an error to the calling view.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::*;
pub use error::*;
pub use models::*;
pub use transport::*;
