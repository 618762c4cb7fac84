//! Lookup batch configuration.

use serde::{Deserialize, Serialize};

/// Maximum storm requests in flight per lookup.
const fn default_concurrency() -> usize {
    10
}

/// Maximum nodes the backend returns per query.
const fn default_result_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            result_limit: default_result_limit(),
        }
    }
}
