//! Prebuilt graph document import.
//!
//! An alternative to building from the schedule: a graph document carries
//! nodes as `[station, train, "HH:MM"]` triples and edges that reference
//! nodes by value. Edge duration is `weight`, falling back to
//! `segment_travel_time`; non-positive durations and edges whose endpoints
//! are not in the node table are dropped.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{DayMinute, TrainId};

use super::{Edge, EdgeKind, Graph, Node, NodeId};

/// Errors raised while importing a prebuilt graph document.
#[derive(Debug, thiserror::Error)]
pub enum GraphImportError {
    /// The document is not valid JSON or is missing required fields.
    #[error("malformed graph document: {0}")]
    Json(#[from] serde_json::Error),

    /// A node triple carries an unparsable time.
    #[error("node ({station}, {train}): invalid time {value:?}")]
    InvalidNodeTime {
        station: String,
        train: String,
        value: String,
    },

    /// A node triple carries an empty train id.
    #[error("node at {station}: empty train id")]
    EmptyTrainId { station: String },
}

#[derive(Debug, Deserialize)]
struct GraphDoc {
    nodes: Vec<(String, String, String)>,
    edges: Vec<EdgeDoc>,
}

#[derive(Debug, Deserialize)]
struct EdgeDoc {
    from: (String, String, String),
    to: (String, String, String),
    #[serde(default)]
    weight: Option<i64>,
    #[serde(default)]
    segment_travel_time: Option<i64>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl EdgeDoc {
    fn minutes(&self) -> i64 {
        self.weight.or(self.segment_travel_time).unwrap_or(0)
    }

    fn kind(&self) -> EdgeKind {
        match self.kind.as_deref() {
            Some("transfer") => EdgeKind::Transfer,
            _ => EdgeKind::Travel,
        }
    }
}

/// Parse a prebuilt graph document.
pub fn import_graph(bytes: &[u8]) -> Result<Graph, GraphImportError> {
    let doc: GraphDoc = serde_json::from_slice(bytes)?;

    let mut graph = Graph::default();
    // Identity triple -> dense id; only needed during construction.
    let mut lookup: HashMap<(String, String, String), NodeId> = HashMap::new();

    for (station, train, time_str) in doc.nodes {
        let time = DayMinute::parse(&time_str).map_err(|_| GraphImportError::InvalidNodeTime {
            station: station.clone(),
            train: train.clone(),
            value: time_str.clone(),
        })?;
        let train_id = TrainId::new(train.clone()).map_err(|_| GraphImportError::EmptyTrainId {
            station: station.clone(),
        })?;

        let id = NodeId(graph.nodes.len() as u32);
        graph.nodes.push(Node {
            station: station.clone(),
            train: train_id,
            time,
        });
        lookup.insert((station, train, time_str), id);
    }

    let mut dropped = 0usize;
    for edge in doc.edges {
        let minutes = edge.minutes();
        if minutes <= 0 {
            dropped += 1;
            continue;
        }
        let (Some(&from), Some(&to)) = (lookup.get(&edge.from), lookup.get(&edge.to)) else {
            dropped += 1;
            continue;
        };
        graph.edges.push(Edge {
            from,
            to,
            kind: edge.kind(),
            minutes: minutes.min(i64::from(u16::MAX)) as u16,
        });
    }

    if dropped > 0 {
        warn!(dropped, "dropped unusable edges from graph document");
    }
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "imported prebuilt graph"
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_nodes_and_edges() {
        let graph = import_graph(
            br#"{
                "nodes": [["X", "T1", "08:00"], ["Y", "T1", "08:30"]],
                "edges": [
                    {"from": ["X", "T1", "08:00"], "to": ["Y", "T1", "08:30"],
                     "weight": 30, "segment_travel_time": 27}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        let edge = graph.edges[0];
        assert_eq!(edge.kind, EdgeKind::Travel);
        assert_eq!(edge.minutes, 30);
    }

    #[test]
    fn falls_back_to_segment_travel_time() {
        let graph = import_graph(
            br#"{
                "nodes": [["X", "T1", "08:00"], ["Y", "T1", "08:30"]],
                "edges": [
                    {"from": ["X", "T1", "08:00"], "to": ["Y", "T1", "08:30"],
                     "segment_travel_time": 27}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.edges[0].minutes, 27);
    }

    #[test]
    fn transfer_kind_is_recognized() {
        let graph = import_graph(
            br#"{
                "nodes": [["Y", "T1", "08:30"], ["Y", "T2", "08:40"]],
                "edges": [
                    {"from": ["Y", "T1", "08:30"], "to": ["Y", "T2", "08:40"],
                     "weight": 10, "type": "transfer"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.edges[0].kind, EdgeKind::Transfer);
    }

    #[test]
    fn drops_edges_with_unknown_nodes() {
        let graph = import_graph(
            br#"{
                "nodes": [["X", "T1", "08:00"]],
                "edges": [
                    {"from": ["X", "T1", "08:00"], "to": ["Y", "T1", "08:30"],
                     "weight": 30}
                ]
            }"#,
        )
        .unwrap();

        assert!(graph.edges.is_empty());
    }

    #[test]
    fn drops_non_positive_durations() {
        let graph = import_graph(
            br#"{
                "nodes": [["X", "T1", "08:00"], ["Y", "T1", "08:30"]],
                "edges": [
                    {"from": ["X", "T1", "08:00"], "to": ["Y", "T1", "08:30"],
                     "weight": 0},
                    {"from": ["Y", "T1", "08:30"], "to": ["X", "T1", "08:00"],
                     "weight": -5}
                ]
            }"#,
        )
        .unwrap();

        assert!(graph.edges.is_empty());
    }

    #[test]
    fn rejects_invalid_node_time() {
        let err = import_graph(br#"{"nodes": [["X", "T1", "8am"]], "edges": []}"#).unwrap_err();
        assert!(matches!(err, GraphImportError::InvalidNodeTime { value, .. } if value == "8am"));
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(matches!(
            import_graph(b"{}"),
            Err(GraphImportError::Json(_))
        ));
    }
}
