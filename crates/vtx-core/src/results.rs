//! Host-facing lookup results.
//!
//! A hit serializes as `{ "entity": …, "data": { "summary": […], "details": […] } }`
//! and a miss as `{ "entity": …, "data": null }`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::Entity;

/// Field names owned by [`NodeDetails`]; node props with these names are dropped
/// so the explicit fields win when flattened.
pub const RESERVED_FIELDS: &[&str] = &[
    "entity",
    "created",
    "created_at",
    "seen",
    "dns_rev",
    "form",
    "tags",
    "node_count",
    "query_link",
];

/// Display-ready view of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetails {
    pub entity: Entity,
    /// Raw `.created` property (milliseconds since epoch).
    pub created: Option<Value>,
    /// `.created` rendered as RFC 3339, when it is an integer timestamp.
    pub created_at: Option<String>,
    /// Raw `.seen` interval.
    pub seen: Option<Value>,
    /// Raw `dns:rev` property.
    pub dns_rev: Option<Value>,
    pub form: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Sequence number of this node within its entity.
    pub node_count: u32,
    /// Link that replays the query in the Vertex UI.
    pub query_link: String,
    /// Remaining node properties, merged into the top level.
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    pub summary: Vec<String>,
    pub details: Vec<NodeDetails>,
}

/// Final per-entity result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub entity: Entity,
    pub data: Option<ResultData>,
}

impl LookupResult {
    #[must_use]
    pub const fn miss(entity: Entity) -> Self {
        Self { entity, data: None }
    }

    #[must_use]
    pub const fn is_miss(&self) -> bool {
        self.data.is_none()
    }

    /// Summary tags, empty for a miss.
    #[must_use]
    pub fn summary_tags(&self) -> &[String] {
        self.data.as_ref().map_or(&[], |data| data.summary.as_slice())
    }
}
