//! # vtx-config
//!
//! Layered configuration loading for Vertex storm lookups using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VTX_*` prefix, `__` as separator)
//! 2. Project-level `.vtx/config.toml`
//! 3. User-level `~/.config/vtx/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VTX_VERTEX__URL` -> `vertex.url`, `VTX_SESSION__TTL_SECS` ->
//! `session.ttl_secs`, etc. The `__` (double underscore) separates nested
//! config sections.
//!
//! # Usage
//!
//! ```no_run
//! use vtx_config::VtxConfig;
//!
//! let config = VtxConfig::load_with_dotenv().expect("config");
//! if config.vertex.is_configured() {
//!     println!("Vertex URL: {}", config.vertex.url);
//! }
//! ```

mod error;
mod general;
mod lookup;
mod request;
mod session;
mod vertex;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use lookup::LookupConfig;
pub use request::RequestConfig;
pub use session::SessionConfig;
pub use vertex::{OptionError, REQUIRED_OPTIONS, VertexConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VtxConfig {
    #[serde(default)]
    pub vertex: VertexConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl VtxConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed or a
    /// value has the wrong type, and [`ConfigError::InvalidValue`] for values
    /// that parse but cannot work (e.g. zero concurrency).
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can layer additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".vtx/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("VTX_").split("__"))
    }

    /// The Vertex connection options, if all three are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the missing options.
    pub fn require_vertex(&self) -> Result<&VertexConfig, ConfigError> {
        let missing = self.vertex.validate();
        if missing.is_empty() {
            return Ok(&self.vertex);
        }
        Err(ConfigError::NotConfigured {
            section: "vertex".into(),
            missing: missing
                .iter()
                .map(|e| e.key.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Reject values that parse but would stall or break every lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.lookup.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.session.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.ttl_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vtx").join("config.toml"))
    }
}
