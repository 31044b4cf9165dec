//! Node resolution against the core inventory (`Orion.Nodes`) and NCM (`Cirrus.Nodes`).

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::{Query, QueryResult};
use crate::error::{OrionError, OrionResult};

use super::types::EntityId;

/// A node as known to the core inventory and, optionally, NCM.
///
/// `ncm_id` is only ever set when `npm_id` is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrionNode {
    pub npm_id: Option<i64>,
    pub uri: Option<String>,
    pub ip_address: Option<String>,
    pub caption: Option<String>,
    pub ncm_id: Option<EntityId>,
}

impl OrionNode {
    pub fn is_npm(&self) -> bool {
        self.npm_id.is_some()
    }

    pub fn is_ncm(&self) -> bool {
        self.ncm_id.is_some()
    }
}

/// Which `Orion.Nodes` column an identifier is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    IpAddress,
    Caption,
}

impl NodeField {
    pub fn classify(identifier: &str) -> Self {
        if identifier.parse::<IpAddr>().is_ok() {
            NodeField::IpAddress
        } else {
            NodeField::Caption
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            NodeField::IpAddress => "IPAddress",
            NodeField::Caption => "Caption",
        }
    }
}

#[derive(Deserialize)]
struct NodeRow {
    #[serde(rename = "NodeID")]
    node_id: i64,
    #[serde(rename = "Uri")]
    uri: Option<String>,
    #[serde(rename = "IPAddress")]
    ip_address: Option<String>,
    #[serde(rename = "Caption")]
    caption: Option<String>,
}

#[derive(Deserialize)]
struct NcmNodeRow {
    #[serde(rename = "NodeID")]
    node_id: EntityId,
}

/// Resolve an IP address or caption to a node.
///
/// No match yields an empty record; more than one match is an error.
pub fn get_node<Q: Query + ?Sized>(client: &Q, identifier: &str) -> OrionResult<OrionNode> {
    let field = NodeField::classify(identifier);
    let swql = format!(
        "SELECT NodeID, Uri, IPAddress, Caption FROM Orion.Nodes WHERE {}=@query_on",
        field.column()
    );
    debug!(identifier, field = field.column(), "looking up node");

    let data = client.query(&swql, json!({ "query_on": identifier }))?;
    if data.results.is_none() {
        info!(identifier, "no results from Orion for node lookup");
    }
    let rows = data.rows()?;

    let mut node = OrionNode::default();
    match rows {
        [] => {}
        [row] => {
            let row: NodeRow = serde_json::from_value(Value::Object(row.clone()))?;
            node.npm_id = Some(row.node_id);
            node.uri = row.uri;
            node.ip_address = row.ip_address;
            node.caption = row.caption;
        }
        _ => {
            debug!(identifier, matches = rows.len(), "multiple nodes match");
            return Err(OrionError::AmbiguousMatch {
                identifier: identifier.to_string(),
            });
        }
    }

    if let Some(npm_id) = node.npm_id {
        node.ncm_id = get_ncm_id(client, npm_id)?;
    }

    Ok(node)
}

/// The platform may not have NCM installed, so only a single match counts.
fn get_ncm_id<Q: Query + ?Sized>(client: &Q, npm_id: i64) -> OrionResult<Option<EntityId>> {
    let data = client.query(
        "SELECT NodeID FROM Cirrus.Nodes WHERE CoreNodeID=@CoreNodeID",
        json!({ "CoreNodeID": npm_id }),
    )?;

    let Some(rows) = data.results.as_deref() else {
        info!(npm_id, "no results from Orion NCM");
        return Ok(None);
    };
    match rows {
        [row] => match serde_json::from_value::<NcmNodeRow>(Value::Object(row.clone())) {
            Ok(row) => Ok(Some(row.node_id)),
            Err(e) => {
                debug!(npm_id, error = %e, "unusable NCM node id");
                Ok(None)
            }
        },
        _ => {
            debug!(npm_id, matches = rows.len(), "no unique NCM node");
            Ok(None)
        }
    }
}

/// Optional equality filter for [`list_nodes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeMatch {
    SysName(String),
    Caption(String),
}

/// List node ids, sysnames and captions, optionally filtered.
///
/// A failed query is returned as an error, never as an empty result.
pub fn list_nodes<Q: Query + ?Sized>(
    client: &Q,
    matcher: Option<&NodeMatch>,
) -> OrionResult<QueryResult> {
    let mut swql = "SELECT NodeID, SysName, Caption FROM Orion.Nodes".to_string();
    let params = match matcher {
        None => json!({}),
        Some(NodeMatch::SysName(value)) => {
            swql.push_str(" WHERE SysName=@match");
            json!({ "match": value })
        }
        Some(NodeMatch::Caption(value)) => {
            swql.push_str(" WHERE Caption=@match");
            json!({ "match": value })
        }
    };

    let data = client.query(&swql, params)?;
    data.rows()?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSwis;

    fn node_row(id: i64, ip: &str, caption: &str) -> serde_json::Value {
        json!({
            "NodeID": id,
            "Uri": format!("swis://orion/Orion/Orion.Nodes/NodeID={}", id),
            "IPAddress": ip,
            "Caption": caption,
        })
    }

    #[test]
    fn classify_identifiers() {
        assert_eq!(NodeField::classify("192.168.1.10"), NodeField::IpAddress);
        assert_eq!(NodeField::classify("2001:db8::1"), NodeField::IpAddress);
        assert_eq!(NodeField::classify("::1"), NodeField::IpAddress);
        assert_eq!(NodeField::classify("core-sw1"), NodeField::Caption);
        assert_eq!(NodeField::classify("10.0.0"), NodeField::Caption);
        assert_eq!(NodeField::classify("300.1.1.1"), NodeField::Caption);
        assert_eq!(NodeField::classify(""), NodeField::Caption);
    }

    #[test]
    fn ip_identifier_queries_ip_address_column() {
        let fake = FakeSwis::new().respond(json!({ "results": [] }));
        get_node(&fake, "10.1.2.3").unwrap();

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.ends_with("WHERE IPAddress=@query_on"));
        assert_eq!(calls[0].1, json!({ "query_on": "10.1.2.3" }));
    }

    #[test]
    fn caption_identifier_queries_caption_column() {
        let fake = FakeSwis::new().respond(json!({ "results": [] }));
        get_node(&fake, "edge-rtr-02").unwrap();
        assert!(fake.calls()[0].0.ends_with("WHERE Caption=@query_on"));
    }

    #[test]
    fn no_match_returns_empty_node_without_ncm_lookup() {
        let fake = FakeSwis::new().respond(json!({ "results": [] }));
        let node = get_node(&fake, "missing").unwrap();

        assert_eq!(node, OrionNode::default());
        assert!(!node.is_npm());
        assert_eq!(fake.calls().len(), 1);
    }

    #[test]
    fn single_match_populates_primary_and_ncm_fields() {
        let fake = FakeSwis::new()
            .respond(json!({ "results": [node_row(42, "10.0.0.42", "core-sw1")] }))
            .respond(json!({ "results": [{ "NodeID": "6f1c4a52-0d4e-4f4c-9c1e-2b7a8f0e9d11" }] }));
        let node = get_node(&fake, "core-sw1").unwrap();

        assert_eq!(node.npm_id, Some(42));
        assert_eq!(node.uri.as_deref(), Some("swis://orion/Orion/Orion.Nodes/NodeID=42"));
        assert_eq!(node.ip_address.as_deref(), Some("10.0.0.42"));
        assert_eq!(node.caption.as_deref(), Some("core-sw1"));
        assert_eq!(
            node.ncm_id,
            Some(EntityId::Guid("6f1c4a52-0d4e-4f4c-9c1e-2b7a8f0e9d11".to_string()))
        );
        assert!(node.is_npm() && node.is_ncm());

        let calls = fake.calls();
        assert!(calls[1].0.contains("FROM Cirrus.Nodes"));
        assert_eq!(calls[1].1, json!({ "CoreNodeID": 42 }));
    }

    #[test]
    fn numeric_ncm_id_is_accepted() {
        let fake = FakeSwis::new()
            .respond(json!({ "results": [node_row(7, "10.0.0.7", "access-sw7")] }))
            .respond(json!({ "results": [{ "NodeID": 1007 }] }));
        let node = get_node(&fake, "10.0.0.7").unwrap();
        assert_eq!(node.ncm_id, Some(EntityId::Int(1007)));
    }

    #[test]
    fn ambiguous_match_names_the_identifier() {
        let fake = FakeSwis::new().respond(json!({
            "results": [node_row(1, "10.0.0.1", "dup"), node_row(2, "10.0.0.2", "dup")]
        }));
        let err = get_node(&fake, "dup").unwrap_err();

        assert!(matches!(err, OrionError::AmbiguousMatch { ref identifier } if identifier == "dup"));
        assert!(err.to_string().contains("'dup'"));
        assert_eq!(fake.calls().len(), 1);
    }

    #[test]
    fn missing_ncm_is_tolerated() {
        for ncm_response in [
            json!({ "results": [] }),
            json!({ "results": [{ "NodeID": 1 }, { "NodeID": 2 }] }),
            json!({ "Message": "Entity Cirrus.Nodes not found" }),
        ] {
            let fake = FakeSwis::new()
                .respond(json!({ "results": [node_row(5, "10.0.0.5", "fw1")] }))
                .respond(ncm_response);
            let node = get_node(&fake, "fw1").unwrap();
            assert_eq!(node.npm_id, Some(5));
            assert_eq!(node.ncm_id, None);
        }
    }

    #[test]
    fn ambiguity_wins_over_a_malformed_row() {
        let fake = FakeSwis::new().respond(json!({
            "results": [node_row(1, "10.0.0.1", "dup"), { "NodeID": "x" }]
        }));
        assert!(matches!(
            get_node(&fake, "dup"),
            Err(OrionError::AmbiguousMatch { ref identifier }) if identifier == "dup"
        ));
    }

    #[test]
    fn malformed_single_row_is_a_decode_error() {
        let fake = FakeSwis::new().respond(json!({ "results": [{ "NodeID": "x" }] }));
        assert!(matches!(get_node(&fake, "fw1"), Err(OrionError::Decode(_))));
    }

    #[test]
    fn null_ncm_node_id_is_tolerated() {
        let fake = FakeSwis::new()
            .respond(json!({ "results": [node_row(9, "10.0.0.9", "lab-sw9")] }))
            .respond(json!({ "results": [{ "NodeID": null }] }));
        let node = get_node(&fake, "lab-sw9").unwrap();
        assert_eq!(node.npm_id, Some(9));
        assert_eq!(node.ncm_id, None);
    }

    #[test]
    fn missing_results_on_primary_lookup_fails() {
        let fake = FakeSwis::new().respond(json!({ "Message": "invalid query" }));
        assert!(matches!(
            get_node(&fake, "fw1"),
            Err(OrionError::MissingResults(_))
        ));
    }

    #[test]
    fn transport_failure_propagates() {
        let fake = FakeSwis::new().fail(OrionError::Http {
            url: "https://orion/Query".to_string(),
            status: 503,
            body: String::new(),
        });
        assert!(matches!(
            get_node(&fake, "fw1"),
            Err(OrionError::Http { status: 503, .. })
        ));
    }

    #[test]
    fn list_nodes_binds_the_match_value() {
        let fake = FakeSwis::new()
            .respond(json!({ "results": [{ "NodeID": 1, "SysName": "r1", "Caption": "r1" }] }));
        let result = list_nodes(&fake, Some(&NodeMatch::SysName("r1' OR 1=1".to_string()))).unwrap();

        assert_eq!(result.rows().unwrap().len(), 1);
        let calls = fake.calls();
        assert!(calls[0].0.ends_with("WHERE SysName=@match"));
        assert_eq!(calls[0].1, json!({ "match": "r1' OR 1=1" }));
    }

    #[test]
    fn list_nodes_distinguishes_failure_from_empty() {
        let fake = FakeSwis::new().respond(json!({ "results": [] }));
        let result = list_nodes(&fake, None).unwrap();
        assert_eq!(result.results, Some(vec![]));
        assert_eq!(fake.calls()[0].0, "SELECT NodeID, SysName, Caption FROM Orion.Nodes");

        let fake = FakeSwis::new().fail(OrionError::Http {
            url: "https://orion/Query".to_string(),
            status: 500,
            body: "boom".to_string(),
        });
        assert!(list_nodes(&fake, Some(&NodeMatch::Caption("x".to_string()))).is_err());
    }
}
