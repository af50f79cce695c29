//! The immutable loaded-data bundle shared by all requests.
//!
//! A `Snapshot` holds the validated schedule tables, the time-expanded
//! graph, and the adjacency index. It is built once at startup, wrapped in
//! an `Arc`, and read concurrently without synchronization; nothing
//! mutates it after publication.

use std::path::Path;

use tracing::info;

use crate::graph::{build_graph, import_graph, Adjacency, Graph, GraphImportError, TransferPolicy};
use crate::schedule::{Schedule, ScheduleError};

/// Errors raised while assembling a snapshot at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Graph(#[from] GraphImportError),
}

/// Per-structure load flags reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoaded {
    pub graph: bool,
    pub schedule: bool,
    pub train_info: bool,
    pub directionality_map: bool,
    pub adjacency: bool,
    pub nodes: bool,
    pub stations_list: bool,
}

impl DataLoaded {
    /// True when every structure is usable.
    pub fn all(&self) -> bool {
        self.graph
            && self.schedule
            && self.train_info
            && self.directionality_map
            && self.adjacency
            && self.nodes
            && self.stations_list
    }
}

/// The immutable bundle of loaded data.
#[derive(Debug, Clone)]
pub struct Snapshot {
    schedule: Schedule,
    graph: Graph,
    adjacency: Adjacency,
}

impl Snapshot {
    /// Build a snapshot from a validated schedule and a transfer policy.
    pub fn build(schedule: Schedule, policy: TransferPolicy) -> Self {
        let graph = build_graph(&schedule, policy);
        let adjacency = Adjacency::build(graph.nodes.len(), &graph.edges);
        Self {
            schedule,
            graph,
            adjacency,
        }
    }

    /// Assemble a snapshot around a prebuilt graph. The schedule still
    /// supplies train metadata and the station directory.
    pub fn with_graph(schedule: Schedule, graph: Graph) -> Self {
        let adjacency = Adjacency::build(graph.nodes.len(), &graph.edges);
        Self {
            schedule,
            graph,
            adjacency,
        }
    }

    /// Load from disk: the schedule document, plus either a prebuilt graph
    /// document or a fresh build under the given policy.
    pub fn load(
        schedule_path: &Path,
        graph_path: Option<&Path>,
        policy: TransferPolicy,
    ) -> Result<Self, LoadError> {
        let bytes = read(schedule_path)?;
        let schedule = Schedule::from_json(&bytes)?;

        let snapshot = match graph_path {
            Some(path) => {
                let bytes = read(path)?;
                Self::with_graph(schedule, import_graph(&bytes)?)
            }
            None => Self::build(schedule, policy),
        };

        info!(
            trains = snapshot.schedule.train_count(),
            stations = snapshot.schedule.stations().len(),
            nodes = snapshot.graph.nodes.len(),
            edges = snapshot.adjacency.edge_count(),
            "snapshot ready"
        );
        Ok(snapshot)
    }

    /// The validated schedule tables.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The time-expanded graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The outbound adjacency index.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Flags for the health endpoint.
    pub fn data_loaded(&self) -> DataLoaded {
        let nodes = !self.graph.nodes.is_empty();
        let adjacency = !self.adjacency.is_empty();
        DataLoaded {
            graph: nodes && adjacency,
            schedule: self.schedule.train_count() > 0,
            train_info: self.schedule.train_count() > 0,
            // The direction map may legitimately be empty.
            directionality_map: true,
            adjacency,
            nodes,
            stations_list: !self.schedule.stations().is_empty(),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}
