use thiserror::Error;

/// Session-level failures.
///
/// `Clone` so a single refresh settlement can be handed to every caller that
/// joined the in-flight operation.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Refresh abandoned before settlement")]
    RefreshAbandoned,
}

pub type Result<T> = std::result::Result<T, SessionError>;
