//! Login and session lifecycle.
//!
//! ```text
//! NoSession ──ensure_session──▶ Authenticating ──ok──▶ Authenticated
//!     ▲                               │                   │
//!     └────────── error ──────────────┘   force_refresh ──┘ (back to Authenticating)
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use vtx_client::{RawResponse, RequestDescriptor, Transport};
use vtx_config::{SessionConfig, VertexConfig};
use vtx_core::LookupError;

use crate::cache::{Session, SessionCache, SessionCacheKey};

/// Credentials for one Vertex deployment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn cache_key(&self) -> SessionCacheKey {
        SessionCacheKey::derive(&self.base_url, &self.username, &self.password)
    }

    #[must_use]
    pub fn login_request(&self) -> RequestDescriptor {
        RequestDescriptor::login(&self.base_url, &self.username, &self.password)
    }
}

impl From<&VertexConfig> for Credentials {
    fn from(config: &VertexConfig) -> Self {
        Self::new(config.base_url(), &config.username, &config.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed-delay retry for transient login failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Retry without waiting between attempts.
    #[must_use]
    pub const fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay: Duration::ZERO,
        }
    }
}

impl From<&SessionConfig> for RetryPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            max_retries: config.login_retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoSession,
    Authenticating,
    Authenticated,
}

/// Obtains, caches, and refreshes Vertex sessions.
pub struct AuthController<T> {
    transport: Arc<T>,
    cache: Arc<SessionCache>,
    retry: RetryPolicy,
    in_progress: Mutex<HashSet<SessionCacheKey>>,
}

impl<T: Transport> AuthController<T> {
    #[must_use]
    pub fn new(transport: Arc<T>, cache: Arc<SessionCache>) -> Self {
        Self {
            transport,
            cache,
            retry: RetryPolicy::default(),
            in_progress: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    #[must_use]
    pub fn state(&self, credentials: &Credentials) -> AuthState {
        let key = credentials.cache_key();
        let authenticating = self
            .in_progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key);
        if authenticating {
            AuthState::Authenticating
        } else if self.cache.get(&key).is_some() {
            AuthState::Authenticated
        } else {
            AuthState::NoSession
        }
    }

    /// Drop any cached session for `credentials`.
    pub fn invalidate(&self, credentials: &Credentials) {
        let key = credentials.cache_key();
        if self.cache.delete(&key).is_some() {
            tracing::debug!(key = %key, "invalidated cached session");
        }
    }

    /// Return a valid session, logging in if needed.
    ///
    /// With `force_refresh = false` a cached, unexpired session is returned
    /// without any network call. With `force_refresh = true` the cached entry
    /// is deleted first and a fresh login is always performed.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Auth`] if login is refused (401/403), returns no
    ///   session cookie, or keeps failing transiently past the retry budget
    /// - [`LookupError::Request`] for other 4xx login responses (not retried)
    pub async fn ensure_session(
        &self,
        credentials: &Credentials,
        force_refresh: bool,
    ) -> Result<Session, LookupError> {
        let key = credentials.cache_key();

        if force_refresh {
            self.invalidate(credentials);
        } else if let Some(session) = self.cache.get(&key) {
            tracing::trace!(key = %key, "using cached session");
            return Ok(session);
        }

        let token = {
            let _guard = InProgress::enter(&self.in_progress, key.clone());
            self.login(credentials).await?
        };

        tracing::debug!(key = %key, force_refresh, "authenticated with Vertex");
        Ok(self.cache.insert(key, token))
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, LookupError> {
        let request = credentials.login_request();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.transport.execute(&request).await {
                Ok(resp) => return session_token(&resp),
                Err(error) if error.is_transient() && attempt <= self.retry.max_retries => {
                    tracing::warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        %error,
                        "login failed; retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(error) if error.is_transient() => {
                    tracing::error!(attempts = attempt, %error, "login retries exhausted");
                    return Err(LookupError::auth(format!(
                        "login failed after {attempt} attempts: {error}"
                    )));
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Extract the `Cookie` header value from a login response's `set-cookie`
/// headers (`name=value` pairs joined with `; `).
///
/// # Errors
///
/// Returns [`LookupError::Auth`] for a 401 response or when no cookie is set.
pub fn session_token(resp: &RawResponse) -> Result<String, LookupError> {
    if resp.is_auth_expired() {
        return Err(LookupError::auth(
            "login rejected (401): check the Vertex username and password",
        ));
    }
    let cookies: Vec<&str> = resp
        .header_values("set-cookie")
        .filter_map(|cookie| cookie.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if cookies.is_empty() {
        return Err(LookupError::auth(
            "login response did not include a session cookie",
        ));
    }
    Ok(cookies.join("; "))
}

/// Marks a key as authenticating for the guard's lifetime.
struct InProgress<'a> {
    set: &'a Mutex<HashSet<SessionCacheKey>>,
    key: SessionCacheKey,
}

impl<'a> InProgress<'a> {
    fn enter(set: &'a Mutex<HashSet<SessionCacheKey>>, key: SessionCacheKey) -> Self {
        set.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        Self { set, key }
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
