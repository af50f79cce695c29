//! Dense outbound adjacency index.

use tracing::warn;

use super::{Edge, EdgeKind, NodeId};

/// One outbound hop stored in the adjacency index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub to: NodeId,
    pub kind: EdgeKind,
    pub minutes: u16,
}

/// Outbound adjacency for every node, indexed by dense node id.
///
/// Immutable after construction; reads need no synchronization.
#[derive(Debug, Clone)]
pub struct Adjacency {
    lists: Vec<Vec<Hop>>,
    edge_count: usize,
}

impl Adjacency {
    /// Build the index from an edge list.
    ///
    /// Edges referencing nodes outside the table are dropped; the loader
    /// guarantees they do not occur.
    pub fn build(node_count: usize, edges: &[Edge]) -> Self {
        let mut lists: Vec<Vec<Hop>> = vec![Vec::new(); node_count];
        let mut edge_count = 0;

        for edge in edges {
            if edge.from.index() >= node_count || edge.to.index() >= node_count {
                warn!(from = %edge.from, to = %edge.to, "dropping edge with unknown endpoint");
                continue;
            }
            lists[edge.from.index()].push(Hop {
                to: edge.to,
                kind: edge.kind,
                minutes: edge.minutes,
            });
            edge_count += 1;
        }

        Self { lists, edge_count }
    }

    /// Outbound hops from a node.
    pub fn outbound(&self, id: NodeId) -> &[Hop] {
        self.lists.get(id.index()).map_or(&[], Vec::as_slice)
    }

    /// Number of nodes indexed.
    pub fn node_count(&self) -> usize {
        self.lists.len()
    }

    /// Number of edges indexed.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// True when no nodes are indexed.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: u32, to: u32, kind: EdgeKind, minutes: u16) -> Edge {
        Edge {
            from: NodeId(from),
            to: NodeId(to),
            kind,
            minutes,
        }
    }

    #[test]
    fn indexes_outbound_edges() {
        let edges = vec![
            edge(0, 1, EdgeKind::Travel, 30),
            edge(1, 2, EdgeKind::Transfer, 10),
            edge(0, 2, EdgeKind::Transfer, 40),
        ];
        let adjacency = Adjacency::build(3, &edges);

        assert_eq!(adjacency.node_count(), 3);
        assert_eq!(adjacency.edge_count(), 3);
        assert_eq!(adjacency.outbound(NodeId(0)).len(), 2);
        assert_eq!(adjacency.outbound(NodeId(1)).len(), 1);
        assert!(adjacency.outbound(NodeId(2)).is_empty());

        let hop = adjacency.outbound(NodeId(1))[0];
        assert_eq!(hop.to, NodeId(2));
        assert_eq!(hop.kind, EdgeKind::Transfer);
        assert_eq!(hop.minutes, 10);
    }

    #[test]
    fn drops_edges_with_unknown_endpoints() {
        let edges = vec![
            edge(0, 1, EdgeKind::Travel, 30),
            edge(0, 9, EdgeKind::Travel, 30),
            edge(9, 1, EdgeKind::Travel, 30),
        ];
        let adjacency = Adjacency::build(2, &edges);

        assert_eq!(adjacency.edge_count(), 1);
        assert_eq!(adjacency.outbound(NodeId(0)).len(), 1);
    }

    #[test]
    fn out_of_range_lookup_is_empty() {
        let adjacency = Adjacency::build(1, &[]);
        assert!(adjacency.outbound(NodeId(7)).is_empty());
    }
}
