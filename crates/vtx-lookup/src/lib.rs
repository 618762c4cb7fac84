//! # vtx-lookup
//!
//! Host-facing surface for Vertex storm lookups:
//! - [`startup()`]: install the host's logger once
//! - [`validate_options()`]: check user options before any lookup
//! - [`VertexLookup::do_lookup`]: resolve a batch of entities
//!
//! ```no_run
//! use vtx_config::VtxConfig;
//! use vtx_core::Entity;
//! use vtx_lookup::VertexLookup;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VtxConfig::load()?;
//! let lookup = VertexLookup::from_config(&config)?;
//! let results = lookup
//!     .run(&[Entity::new("IPv4", "1.2.3.4")], &config.vertex)
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&results)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod lookup;

pub use aggregate::{build_details, build_result, build_results, query_link, summary_tags};
pub use lookup::{LookupSettings, VertexLookup};

use serde_json::Value;
use vtx_config::{OptionError, REQUIRED_OPTIONS};
use vtx_core::LookupError;

/// Install `subscriber` as the process-wide logger.
///
/// # Errors
///
/// Returns [`LookupError::Config`] if a global subscriber is already set.
pub fn startup<S>(subscriber: S) -> Result<(), LookupError>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LookupError::Config(format!("logger already installed: {e}")))?;
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "vtx lookup started");
    Ok(())
}

/// Validate host-shaped options (`{"url": {"value": "..."}, ...}`).
///
/// Returns one [`OptionError`] per required option that is absent, not a
/// string, or the empty string. An empty list means the options are usable.
#[must_use]
pub fn validate_options(options: &Value) -> Vec<OptionError> {
    REQUIRED_OPTIONS
        .iter()
        .filter(|(key, _)| {
            options
                .get(key)
                .and_then(|option| option.get("value"))
                .and_then(Value::as_str)
                .is_none_or(str::is_empty)
        })
        .map(|(key, _)| OptionError::missing(key))
        .collect()
}
