//! HTTP request options: TLS material, proxy, and timeout.

use serde::{Deserialize, Serialize};

/// Default per-request timeout in seconds (0 disables the timeout).
const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestConfig {
    /// Path to a PEM Certificate Authority bundle. Empty to ignore.
    #[serde(default)]
    pub ca: String,

    /// Path to a PEM client certificate. Empty to ignore.
    #[serde(default)]
    pub cert: String,

    /// Path to the PEM private key for `cert`. Empty to ignore.
    #[serde(default)]
    pub key: String,

    /// Key passphrase. Encrypted keys are not supported by the TLS backend;
    /// a non-empty value is logged and otherwise ignored.
    #[serde(default)]
    pub passphrase: String,

    /// HTTP proxy URL, optionally with embedded basic auth.
    #[serde(default)]
    pub proxy: String,

    /// Set to `false` to accept invalid server certificates.
    #[serde(default)]
    pub reject_unauthorized: Option<bool>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            ca: String::new(),
            cert: String::new(),
            key: String::new(),
            passphrase: String::new(),
            proxy: String::new(),
            reject_unauthorized: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RequestConfig {
    /// Whether both halves of a client identity are present.
    #[must_use]
    pub fn has_client_identity(&self) -> bool {
        !self.cert.is_empty() && !self.key.is_empty()
    }

    #[must_use]
    pub fn accepts_invalid_certs(&self) -> bool {
        self.reject_unauthorized == Some(false)
    }
}
