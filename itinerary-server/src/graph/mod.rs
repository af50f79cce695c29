//! Time-expanded graph construction and indexing.
//!
//! Each physical visit of a train to a station becomes one node, keyed by
//! (station, train, minute). Travel edges link consecutive stops of a
//! train; transfer edges link co-located nodes of different trains within
//! a wait window. Encoding time in the node makes the enumerator a plain
//! graph walk with no time constraints to solve during traversal.

mod adjacency;
mod build;
mod import;
mod node;

pub use adjacency::{Adjacency, Hop};
pub use build::{build_graph, TransferPolicy};
pub use import::{import_graph, GraphImportError};
pub use node::{Edge, EdgeKind, Graph, Node, NodeId};
