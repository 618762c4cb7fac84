//! Lookup error taxonomy.
//!
//! Every failure that can end a lookup is one of three kinds:
//! - [`LookupError::Network`]: unreachable host or 5xx, infrastructure-level
//! - [`LookupError::Request`]: 4xx other than 401/403, not retried
//! - [`LookupError::Auth`]: 403, exhausted login retries, or a 401 that
//!   survived re-authentication
//!
//! [`ErrorReport`] is the serializable shape handed back to the host platform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The backend could not be reached or answered with a server error.
    #[error("Network Error: {message}")]
    Network {
        message: String,
        url: Option<String>,
        status: Option<u16>,
    },

    /// The backend rejected the request.
    #[error("Request Error: {message}")]
    Request {
        message: String,
        url: Option<String>,
        status: u16,
        /// Seconds from a `Retry-After` header, set for 429 responses.
        retry_after_secs: Option<u64>,
    },

    /// Login failed or the session was refused.
    #[error("Auth Error: {message}")]
    Auth { message: String },

    /// Lookup options were missing or invalid.
    #[error("Configuration Error: {0}")]
    Config(String),
}

impl LookupError {
    pub fn network(message: impl Into<String>, url: Option<&str>) -> Self {
        Self::Network {
            message: message.into(),
            url: url.map(str::to_string),
            status: None,
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Transient failures are worth retrying (login only).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Host-facing error name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "NetworkError",
            Self::Request { .. } => "RequestError",
            Self::Auth { .. } => "AuthError",
            Self::Config(_) => "ConfigError",
        }
    }

    /// Serializable form for the host platform.
    #[must_use]
    pub fn to_report(&self) -> ErrorReport {
        let (status, url) = match self {
            Self::Network { status, url, .. } => (*status, url.clone()),
            Self::Request { status, url, .. } => (Some(*status), url.clone()),
            Self::Auth { .. } | Self::Config(_) => (None, None),
        };
        ErrorReport {
            kind: self.kind().to_string(),
            detail: self.to_string(),
            status,
            url,
        }
    }
}

/// Structured error returned to the host platform in place of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&LookupError> for ErrorReport {
    fn from(error: &LookupError) -> Self {
        error.to_report()
    }
}
