use dashmap::DashMap;

/// Key prefixes under which the provider persists token artifacts.
const ARTIFACT_PREFIXES: &[&str] = &[
    "access_token",
    "id_token",
    "refresh_token",
    "nonce",
    "PKCE_verifier",
];

/// Key substrings that also mark provider artifacts, wherever the provider
/// namespaces or versions its keys.
const ARTIFACT_SUBSTRINGS: &[&str] = &["session_state", "expires_at"];

/// Whether a storage key holds a session artifact that logout must remove.
///
/// Matching is pattern-based rather than a fixed key list, because provider
/// libraries version and namespace their storage keys.
#[must_use]
pub fn is_session_artifact(key: &str) -> bool {
    ARTIFACT_PREFIXES.iter().any(|p| key.starts_with(p))
        || ARTIFACT_SUBSTRINGS.iter().any(|s| key.contains(s))
}

/// Persisted key-value store shared with the identity provider.
///
/// Mirrors the browser-local storage the provider writes into. The session
/// core only ever enumerates and removes keys; reads and writes exist for
/// provider implementations and tests.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn insert(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    fn keys(&self) -> Vec<String>;

    /// Remove every key the predicate matches, returning how many were
    /// removed.
    fn clear_matching(&self, predicate: &dyn Fn(&str) -> bool) -> usize {
        let mut removed = 0;
        for key in self.keys() {
            if predicate(&key) {
                self.remove(&key);
                removed += 1;
            }
        }
        removed
    }
}

/// In-memory store used by the portal shell during tests and local runs.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: DashMap<String, String>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    fn insert(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}
