//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default log filter when `VTX_LOG` is unset.
fn default_log_level() -> String {
    String::from("warn")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// `tracing` filter directive, e.g. `info` or `vtx_client=trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.log_level, "warn");
    }
}
