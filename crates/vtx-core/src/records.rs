//! Parsed storm nodes and per-entity lookup outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::Entity;

/// One graph node returned for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub entity: Entity,
    /// Node form from the ndef, e.g. `inet:ipv4`.
    pub form: Option<String>,
    pub props: Map<String, Value>,
    /// Tag names applied to the node.
    #[serde(default)]
    pub tags: Vec<String>,
    /// 1-based position among the entity's accepted nodes.
    pub sequence: u32,
}

impl NodeRecord {
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }
}

/// Exactly one outcome exists per looked-up entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Hit {
        entity: Entity,
        records: Vec<NodeRecord>,
    },
    Miss {
        entity: Entity,
    },
}

impl LookupOutcome {
    /// Build the outcome for an entity from its records; no records is a miss.
    #[must_use]
    pub fn from_records(entity: Entity, records: Vec<NodeRecord>) -> Self {
        if records.is_empty() {
            Self::Miss { entity }
        } else {
            Self::Hit { entity, records }
        }
    }

    #[must_use]
    pub const fn entity(&self) -> &Entity {
        match self {
            Self::Hit { entity, .. } | Self::Miss { entity } => entity,
        }
    }

    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Number of nodes found (0 for a miss).
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Hit { records, .. } => records.len(),
            Self::Miss { .. } => 0,
        }
    }
}
