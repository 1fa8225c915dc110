//! Revocation registry: tokens explicitly invalidated before expiry (logout).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Persisted set of revoked tokens, matched by exact string.
///
/// Entries are permanent: the registry never prunes on its own, mirroring the
/// logout semantics the rest of the system is built around. See
/// [`ExpiryIndexedRevocationStore`] for the opt-in pruning variant.
pub trait RevocationStore: Send + Sync {
    /// Insert the literal token string. Duplicate inserts are harmless.
    fn insert(&self, token: &str);
    fn exists(&self, token: &str) -> bool;
}

impl<S> RevocationStore for Arc<S>
where
    S: RevocationStore + ?Sized,
{
    fn insert(&self, token: &str) {
        (**self).insert(token)
    }

    fn exists(&self, token: &str) -> bool {
        (**self).exists(token)
    }
}

/// In-memory revocation set. Unbounded by design.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    inner: RwLock<HashSet<String>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RevocationStore for InMemoryRevocationStore {
    fn insert(&self, token: &str) {
        if let Ok(mut set) = self.inner.write() {
            set.insert(token.to_string());
        }
    }

    fn exists(&self, token: &str) -> bool {
        self.inner
            .read()
            .map(|set| set.contains(token))
            .unwrap_or(false)
    }
}

/// Optional variant that remembers each token's own expiry so entries can be
/// dropped once the token would have died anyway.
///
/// Not wired in by default; callers who want bounded storage use
/// [`ExpiryIndexedRevocationStore::insert_with_expiry`] at logout and run
/// [`ExpiryIndexedRevocationStore::prune_expired`] periodically.
#[derive(Debug, Default)]
pub struct ExpiryIndexedRevocationStore {
    /// token -> unix expiry timestamp
    inner: RwLock<HashMap<String, i64>>,
}

impl ExpiryIndexedRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_with_expiry(&self, token: &str, expires_at: i64) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(token.to_string(), expires_at);
        }
    }

    /// Drop entries whose token expired before `now`. Returns the number removed.
    pub fn prune_expired(&self, now: i64) -> usize {
        match self.inner.write() {
            Ok(mut map) => {
                let before = map.len();
                map.retain(|_, exp| *exp >= now);
                before - map.len()
            }
            Err(_) => 0,
        }
    }
}

impl RevocationStore for ExpiryIndexedRevocationStore {
    fn insert(&self, token: &str) {
        // Without a known expiry the entry is kept forever, same as the
        // plain set.
        self.insert_with_expiry(token, i64::MAX);
    }

    fn exists(&self, token: &str) -> bool {
        self.inner
            .read()
            .map(|map| map.contains_key(token))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let store = InMemoryRevocationStore::new();
        store.insert("tok");
        store.insert("tok");
        assert!(store.exists("tok"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn membership_is_exact_string_match() {
        let store = InMemoryRevocationStore::new();
        store.insert("tok");
        assert!(!store.exists("tok "));
        assert!(!store.exists("TOK"));
    }

    #[test]
    fn expiry_indexed_store_prunes_only_dead_tokens() {
        let store = ExpiryIndexedRevocationStore::new();
        store.insert_with_expiry("dead", 100);
        store.insert_with_expiry("alive", 10_000);
        store.insert("forever");

        assert_eq!(store.prune_expired(500), 1);
        assert!(!store.exists("dead"));
        assert!(store.exists("alive"));
        assert!(store.exists("forever"));
    }
}
