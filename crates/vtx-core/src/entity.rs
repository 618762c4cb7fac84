//! Entities supplied by the host platform and the storm queries derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable type as named by the host platform.
///
/// Unrecognized type names are preserved verbatim in [`EntityType::Other`] so
/// they can pass straight through into the storm query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    IPv4,
    IPv6,
    Domain,
    Email,
    Hash,
    Cve,
    Other(String),
}

impl EntityType {
    /// Host-platform name of the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::IPv4 => "IPv4",
            Self::IPv6 => "IPv6",
            Self::Domain => "domain",
            Self::Email => "email",
            Self::Hash => "hash",
            Self::Cve => "cve",
            Self::Other(name) => name,
        }
    }

    /// Storm form suffix for this type.
    ///
    /// `IPv4 → ipv4`, `IPv6 → ipv6`, `domain → fqdn`, `email → email`;
    /// every other type passes through unchanged.
    #[must_use]
    pub fn storm_type(&self) -> &str {
        match self {
            Self::IPv4 => "ipv4",
            Self::IPv6 => "ipv6",
            Self::Domain => "fqdn",
            Self::Email => "email",
            Self::Hash | Self::Cve | Self::Other(_) => self.as_str(),
        }
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "IPv4" => Self::IPv4,
            "IPv6" => Self::IPv6,
            "domain" => Self::Domain,
            "email" => Self::Email,
            "hash" => Self::Hash,
            "cve" => Self::Cve,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        match value {
            EntityType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observable to look up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub value: String,
}

impl Entity {
    pub fn new(entity_type: impl Into<EntityType>, value: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            value: value.into(),
        }
    }

    /// Storm query for this entity, e.g. `inet:ipv4 = 1.2.3.4`.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("inet:{} = {}", self.entity_type.storm_type(), self.value)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.value)
    }
}
