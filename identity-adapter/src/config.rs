use serde::{Deserialize, Serialize};

/// Static identity-provider settings consumed by provider implementations.
///
/// The session core never interprets these values; they exist so an
/// application shell can construct a concrete provider from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    pub issuer_url: String,
    pub realm: String,
    pub client_id: String,
    pub scope: String,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            issuer_url: "https://id.careportal.dev".to_string(),
            realm: "careportal".to_string(),
            client_id: "portal-frontend".to_string(),
            scope: "openid profile email offline_access".to_string(),
        }
    }
}
