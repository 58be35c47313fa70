use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum IdentityError {
    #[error("Discovery document could not be loaded: {0}")]
    DiscoveryFailed(String),

    #[error("Refresh token rejected: {0}")]
    RefreshRejected(String),

    #[error("Identity provider unreachable: {0}")]
    ProviderUnreachable(String),

    #[error("Provider-side logout failed: {0}")]
    LogoutFailed(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
