//! Tolerant parser for storm `jsonlines` response bodies.
//!
//! Each line is an independent JSON value. Only node messages are kept:
//!
//! ```text
//! ["node", [["inet:ipv4", 16909060], {"iden": "…", "props": {…}, "tags": {…}}]]
//! ```
//!
//! Control messages (`init`, `fini`, `print`, …) are discarded silently and
//! malformed lines are logged and skipped; neither aborts the batch.

use serde_json::{Map, Value};
use vtx_core::{Entity, LookupOutcome, NodeRecord};

use crate::request::RawResponse;

/// Parse one entity's response body into its node records, numbered from 1.
#[must_use]
pub fn parse_body(entity: &Entity, body: &str) -> Vec<NodeRecord> {
    let mut records = Vec::new();
    for (line_no, line) in body.trim_end().lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%entity, line = line_no + 1, %error, "skipping malformed storm line");
                continue;
            }
        };
        let Some(node) = NodeParts::from_message(&value) else {
            continue;
        };
        let sequence = u32::try_from(records.len() + 1).unwrap_or(u32::MAX);
        records.push(NodeRecord {
            entity: entity.clone(),
            form: node.form,
            props: node.props,
            tags: node.tags,
            sequence,
        });
    }
    tracing::trace!(%entity, nodes = records.len(), "parsed storm response");
    records
}

/// One outcome per entity, in entity order.
///
/// An entity with no response, an empty body, or no node lines is a miss.
#[must_use]
pub fn parse_responses(entities: &[Entity], responses: &[RawResponse]) -> Vec<LookupOutcome> {
    entities
        .iter()
        .enumerate()
        .map(|(idx, entity)| {
            let records = responses
                .get(idx)
                .map(|resp| parse_body(entity, &resp.body))
                .unwrap_or_else(|| {
                    tracing::error!(%entity, "no response for entity");
                    Vec::new()
                });
            LookupOutcome::from_records(entity.clone(), records)
        })
        .collect()
}

struct NodeParts {
    form: Option<String>,
    props: Map<String, Value>,
    tags: Vec<String>,
}

impl NodeParts {
    fn from_message(value: &Value) -> Option<Self> {
        let message = value.as_array()?;
        if message.first()?.as_str()? != "node" {
            return None;
        }
        let node = message.get(1)?.as_array()?;
        if node.len() < 2 {
            return None;
        }
        let info = node[1].as_object()?;
        let props = info.get("props")?.as_object()?.clone();
        let form = node[0]
            .as_array()
            .and_then(|ndef| ndef.first())
            .and_then(Value::as_str)
            .map(str::to_string);
        let tags = info
            .get("tags")
            .and_then(Value::as_object)
            .map(|tags| tags.keys().cloned().collect())
            .unwrap_or_default();
        Some(Self { form, props, tags })
    }
}
