//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::SearchConfig;
use crate::snapshot::Snapshot;

/// Shared application state.
///
/// The snapshot is immutable; handlers clone the `Arc` and read it
/// concurrently without synchronization.
#[derive(Clone)]
pub struct AppState {
    /// Loaded timetable, graph, and adjacency.
    pub snapshot: Arc<Snapshot>,

    /// Planner configuration.
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(snapshot: Snapshot, config: SearchConfig) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            config: Arc::new(config),
        }
    }
}
