//! Access-token claim decoding.
//!
//! The payload segment is decoded without signature verification: the trust
//! boundary is the identity provider and the API gateway, not this client.
//! Any malformed token yields the empty claim set, so role checks fail
//! closed instead of erroring.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

/// Decode the claims of a JWT-shaped token. Returns an empty map when the
/// token does not parse.
#[must_use]
pub fn decode_claims(token: &str) -> Map<String, Value> {
    let Some(payload) = token.split('.').nth(1) else {
        return Map::new();
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
        return Map::new();
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Extract the role collection from a claim set.
///
/// Accepts both a top-level `roles` array and the Keycloak-style
/// `realm_access.roles` nesting.
#[must_use]
pub fn roles_of(claims: &Map<String, Value>) -> Vec<String> {
    let direct = claims.get("roles");
    let nested = claims
        .get("realm_access")
        .and_then(|ra| ra.get("roles"));

    direct
        .or(nested)
        .and_then(Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(|r| r.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
