//! Node and edge types for the time-expanded graph.

use std::fmt;

use crate::domain::{DayMinute, TrainId};

/// Dense index of a node in the graph's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the index as a usize for table lookups.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A time-expanded node: one visit of one train to one station.
///
/// The triple (station, train, time) is the node's identity. Nodes are
/// created at graph build and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Station display name.
    pub station: String,
    /// The train making this visit.
    pub train: TrainId,
    /// Minute of day of the visit.
    pub time: DayMinute,
}

/// Edge classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Riding a train between consecutive stops.
    Travel,
    /// Waiting at a station to board a different train.
    Transfer,
}

/// A directed edge between time-expanded nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    /// Strictly positive duration in minutes.
    pub minutes: u16,
}

/// The time-expanded graph: node table plus edge list.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Ids of every node at the given station, in table order.
    pub fn nodes_at(&self, station: &str) -> impl Iterator<Item = NodeId> + '_ {
        let station = station.to_string();
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.station == station)
            .map(|(i, _)| NodeId(i as u32))
    }
}
