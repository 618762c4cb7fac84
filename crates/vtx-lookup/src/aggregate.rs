//! Turns lookup outcomes into host-facing results.

use serde_json::Value;
use vtx_core::results::RESERVED_FIELDS;
use vtx_core::{Entity, LookupOutcome, LookupResult, NodeDetails, NodeRecord, ResultData};

const CREATED_PROP: &str = ".created";
const SEEN_PROP: &str = ".seen";
const DNS_REV_PROP: &str = "dns:rev";

/// One result per outcome, order preserved.
#[must_use]
pub fn build_results(outcomes: Vec<LookupOutcome>, base_url: &str) -> Vec<LookupResult> {
    outcomes
        .into_iter()
        .map(|outcome| build_result(outcome, base_url))
        .collect()
}

#[must_use]
pub fn build_result(outcome: LookupOutcome, base_url: &str) -> LookupResult {
    match outcome {
        LookupOutcome::Miss { entity } => LookupResult::miss(entity),
        LookupOutcome::Hit { entity, records } => {
            let summary = summary_tags(records.len());
            let details = records
                .into_iter()
                .map(|record| build_details(record, base_url))
                .collect();
            LookupResult {
                entity,
                data: Some(ResultData { summary, details }),
            }
        }
    }
}

/// Flatten one node into its display fields plus remaining props.
#[must_use]
pub fn build_details(record: NodeRecord, base_url: &str) -> NodeDetails {
    let NodeRecord {
        entity,
        form,
        mut props,
        tags,
        sequence,
    } = record;

    let created = props.get(CREATED_PROP).cloned();
    let seen = props.get(SEEN_PROP).cloned();
    let dns_rev = props.get(DNS_REV_PROP).cloned();
    let created_at = created.as_ref().and_then(rfc3339_from_millis);
    let query_link = query_link(base_url, &entity);

    props.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));

    NodeDetails {
        entity,
        created,
        created_at,
        seen,
        dns_rev,
        form,
        tags,
        node_count: sequence,
        query_link,
        props,
    }
}

#[must_use]
pub fn summary_tags(node_count: usize) -> Vec<String> {
    vec![format!("Node Count: {node_count}")]
}

/// Link that replays the entity's query in the Vertex UI.
#[must_use]
pub fn query_link(base_url: &str, entity: &Entity) -> String {
    format!(
        "{}/storm?query={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&entity.to_query())
    )
}

fn rfc3339_from_millis(value: &Value) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(value.as_i64()?).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

    const BASE: &str = "https://vertex.local";

    fn record(props: Value, sequence: u32) -> NodeRecord {
        let Value::Object(props) = props else {
            panic!("props must be an object");
        };
        NodeRecord {
            entity: Entity::new("IPv4", "1.2.3.4"),
            form: Some("inet:ipv4".into()),
            props,
            tags: vec!["rep.bad".into()],
            sequence,
        }
    }

    #[test]
    fn details_round_trip_record_fields() {
        let source = record(
            json!({ ".created": 100, ".seen": [1, 2], "dns:rev": "x.example", "asn": 64512 }),
            3,
        );
        let details = build_details(source.clone(), BASE);

        assert_eq!(details.entity, source.entity);
        assert_eq!(details.created.as_ref(), source.prop(".created"));
        assert_eq!(details.seen.as_ref(), source.prop(".seen"));
        assert_eq!(details.dns_rev.as_ref(), source.prop("dns:rev"));
        assert_eq!(details.node_count, source.sequence);
        assert_eq!(
            details.query_link,
            "https://vertex.local/storm?query=inet%3Aipv4%20%3D%201.2.3.4"
        );
        assert_eq!(details.props["asn"], 64512);
        assert_eq!(details.props[".created"], 100);
    }

    #[test]
    fn non_string_dns_rev_is_kept() {
        let source = record(json!({ "dns:rev": ["a.example", "b.example"] }), 1);
        let details = build_details(source.clone(), BASE);
        assert_eq!(details.dns_rev, Some(json!(["a.example", "b.example"])));
        assert_eq!(details.dns_rev.as_ref(), source.prop("dns:rev"));
    }

    #[test]
    fn missing_props_default_to_none() {
        let details = build_details(record(json!({}), 1), BASE);
        assert!(details.created.is_none());
        assert!(details.created_at.is_none());
        assert!(details.seen.is_none());
        assert!(details.dns_rev.is_none());
    }

    #[test]
    fn created_millis_render_as_rfc3339() {
        let details = build_details(record(json!({ ".created": 1_700_000_000_000_i64 }), 1), BASE);
        assert_eq!(
            details.created_at.as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
    }

    #[test]
    fn explicit_fields_win_over_props() {
        let details = build_details(
            record(json!({ "entity": "spoofed", "node_count": 99, "query_link": "x" }), 2),
            BASE,
        );
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["entity"]["value"], "1.2.3.4");
        assert_eq!(json["node_count"], 2);
        assert!(json["query_link"].as_str().unwrap().starts_with(BASE));
        assert_eq!(details.props, Map::new());
    }

    #[test]
    fn hit_summarizes_node_count() {
        let outcome = LookupOutcome::Hit {
            entity: Entity::new("IPv4", "1.2.3.4"),
            records: vec![record(json!({}), 1), record(json!({}), 2)],
        };
        let result = build_result(outcome, BASE);
        assert_eq!(result.summary_tags(), ["Node Count: 2"]);
        let data = result.data.unwrap();
        let counts: Vec<_> = data.details.iter().map(|d| d.node_count).collect();
        assert_eq!(counts, [1, 2]);
    }

    #[test]
    fn miss_has_no_data() {
        let outcome = LookupOutcome::Miss {
            entity: Entity::new("domain", "nothing.example"),
        };
        let result = build_result(outcome, BASE);
        assert!(result.is_miss());
    }
}
