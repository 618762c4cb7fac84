//! TTL cache of session cookies keyed by credential fingerprint.
//!
//! Entries expire a fixed time after insertion regardless of use. An expired
//! entry is never returned: reads treat it as a miss and evict it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;

/// Sessions live for 24 hours unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// SHA-256 fingerprint of `(base_url, username, password)`.
///
/// Formatting shows only the first 8 hex characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionCacheKey(String);

impl SessionCacheKey {
    #[must_use]
    pub fn derive(base_url: &str, username: &str, password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(base_url.trim_end_matches('/').as_bytes());
        hasher.update([0]);
        hasher.update(username.as_bytes());
        hasher.update([0]);
        hasher.update(password.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Debug for SessionCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionCacheKey({}…)", self.short())
    }
}

impl fmt::Display for SessionCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// A cached login session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Value for the `Cookie` request header.
    pub token: String,
    pub expires_at: Instant,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Shared session store. One instance is typically shared by every lookup.
#[derive(Debug)]
pub struct SessionCache {
    entries: Mutex<HashMap<SessionCacheKey, Session>>,
    default_ttl: Duration,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SessionCache {
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Unexpired session for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &SessionCacheKey) -> Option<Session> {
        let mut entries = self.lock();
        let session = entries.get(key)?.clone();
        if session.is_expired() {
            tracing::debug!(key = %key, "cached session expired");
            entries.remove(key);
            return None;
        }
        Some(session)
    }

    /// Store `token` for `key`, expiring `ttl` from now. Replaces any entry.
    pub fn set(&self, key: SessionCacheKey, token: impl Into<String>, ttl: Duration) -> Session {
        let session = Session {
            token: token.into(),
            expires_at: Instant::now() + ttl,
        };
        self.lock().insert(key, session.clone());
        session
    }

    /// Store `token` with the cache's default TTL.
    pub fn insert(&self, key: SessionCacheKey, token: impl Into<String>) -> Session {
        self.set(key, token, self.default_ttl)
    }

    /// Remove the entry for `key`, returning it if present.
    pub fn delete(&self, key: &SessionCacheKey) -> Option<Session> {
        self.lock().remove(key)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        self.lock().retain(|_, session| !session.is_expired());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionCacheKey, Session>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
