//! Session caching and login retry configuration.

use serde::{Deserialize, Serialize};

/// Cached sessions live for 24 hours.
const fn default_ttl_secs() -> u64 {
    86_400
}

const fn default_login_retries() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Lifetime of a cached session, measured from login.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Login retries after the first attempt on transient failures.
    #[serde(default = "default_login_retries")]
    pub login_retries: u32,

    /// Fixed delay between login attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            login_retries: default_login_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}
