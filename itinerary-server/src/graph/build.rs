//! Time-expanded graph construction from a schedule.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::DayMinute;
use crate::schedule::Schedule;

use super::{Edge, EdgeKind, Graph, Node, NodeId};

/// Transfer-edge policy applied at graph build time.
///
/// A transfer edge is emitted between two co-located nodes of different
/// trains whenever the wait between them falls within
/// `[min_connect, max_wait]`. These are build parameters, never query
/// parameters, and are never inferred from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPolicy {
    /// Minimum connection time in minutes.
    pub min_connect: u16,
    /// Maximum wait in minutes.
    pub max_wait: u16,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            min_connect: 15,
            max_wait: 90,
        }
    }
}

/// Build the time-expanded graph for a schedule.
///
/// One node per stop of each train; travel edges between consecutive stops
/// (zero-duration legs are skipped); transfer edges per station under the
/// given policy. The last stop of a train yields a node with no outgoing
/// travel edge.
pub fn build_graph(schedule: &Schedule, policy: TransferPolicy) -> Graph {
    let mut graph = Graph::default();

    // Station name -> nodes seen there, for transfer generation.
    let mut by_station: BTreeMap<&str, Vec<NodeId>> = BTreeMap::new();

    for train in schedule.trains() {
        let mut prev: Option<(NodeId, DayMinute)> = None;

        for stop in &train.stops {
            let id = NodeId(graph.nodes.len() as u32);
            graph.nodes.push(Node {
                station: stop.station.clone(),
                train: train.id.clone(),
                time: stop.time,
            });
            by_station.entry(&stop.station).or_default().push(id);

            if let Some((prev_id, prev_time)) = prev {
                let minutes = prev_time.until(stop.time);
                if minutes > 0 {
                    graph.edges.push(Edge {
                        from: prev_id,
                        to: id,
                        kind: EdgeKind::Travel,
                        minutes,
                    });
                }
            }
            prev = Some((id, stop.time));
        }
    }

    let travel_edges = graph.edges.len();

    // Transfer edges: every ordered pair of co-located nodes of different
    // trains whose wait falls inside the policy window. No ordering
    // preference between simultaneous departures.
    for ids in by_station.values() {
        for &from in ids {
            for &to in ids {
                if from == to {
                    continue;
                }
                let (u, v) = (graph.node(from), graph.node(to));
                if u.train == v.train {
                    continue;
                }
                let wait = u.time.until(v.time);
                // Edge durations are strictly positive even under a zero
                // min_connect policy.
                if wait > 0 && wait >= policy.min_connect && wait <= policy.max_wait {
                    graph.edges.push(Edge {
                        from,
                        to,
                        kind: EdgeKind::Transfer,
                        minutes: wait,
                    });
                }
            }
        }
    }

    debug!(
        nodes = graph.nodes.len(),
        travel_edges,
        transfer_edges = graph.edges.len() - travel_edges,
        "built time-expanded graph"
    );

    graph
}
