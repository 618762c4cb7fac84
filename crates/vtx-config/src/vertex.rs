//! Vertex connection options: the three operator-provisioned credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Required options, in validation order, with the message shown when missing.
pub const REQUIRED_OPTIONS: &[(&str, &str)] = &[
    ("url", "You must provide a valid URL"),
    ("username", "You must provide a valid Vertex username"),
    ("password", "You must provide a valid Vertex password"),
];

/// A single option validation failure, keyed by option name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionError {
    pub key: String,
    pub message: String,
}

impl OptionError {
    /// Validation failure for a required option with its standard message.
    #[must_use]
    pub fn missing(key: &str) -> Self {
        let message = REQUIRED_OPTIONS
            .iter()
            .find(|(name, _)| *name == key)
            .map_or_else(|| format!("You must provide '{key}'"), |(_, m)| (*m).to_string());
        Self {
            key: key.to_string(),
            message,
        }
    }
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct VertexConfig {
    /// Base URL of the Vertex (Optic) API, e.g. `https://vertex.example.com`.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl VertexConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Options that are empty, one entry per missing field.
    #[must_use]
    pub fn validate(&self) -> Vec<OptionError> {
        [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| OptionError::missing(key))
        .collect()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.validate().is_empty()
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl fmt::Debug for VertexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_not_configured() {
        let config = VertexConfig::default();
        assert!(!config.is_configured());
        let keys: Vec<_> = config.validate().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["url", "username", "password"]);
    }

    #[test]
    fn reports_only_missing_fields() {
        let config = VertexConfig::new("https://vertex.local", "analyst", "");
        assert_eq!(
            config.validate(),
            vec![OptionError {
                key: "password".into(),
                message: "You must provide a valid Vertex password".into(),
            }]
        );
    }

    #[test]
    fn whitespace_counts_as_provided() {
        let config = VertexConfig::new(" ", "analyst", "  secret  ");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = VertexConfig::new("https://vertex.local/", "a", "b");
        assert_eq!(config.base_url(), "https://vertex.local");
    }

    #[test]
    fn debug_redacts_password() {
        let config = VertexConfig::new("https://vertex.local", "analyst", "hunter2");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
