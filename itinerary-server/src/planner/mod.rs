//! Itinerary planning: enumeration, post-processing, and the query facade.
//!
//! A query flows through validation, enumeration over the time-expanded
//! graph, the time-window filter, and the train-sequence merge, ending in
//! a ranked list of alternatives. Every stage is a pure function over the
//! immutable snapshot; a failed validation is terminal.

mod config;
mod direction;
mod merge;
mod path;
mod search;

pub use config::SearchConfig;
pub use merge::{MergedPath, TransferOptions};
pub use path::{PathKind, PathSummary, TransferDetail};
pub use search::{find_paths, CancelToken, SearchError, SearchRequest, SearchStats};

use tracing::{debug, info, instrument};

use crate::snapshot::Snapshot;

/// An itinerary query as received from a caller.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub start_station: String,
    pub end_station: String,
    pub max_transfers: i64,
    pub window_minutes: i64,
    pub allow_same_station_consecutive_transfers: bool,
}

/// Error from planning a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Start or end station missing from the request.
    #[error("start and end stations are required")]
    MissingEndpoint,

    /// Start and end name the same station.
    #[error("start and end stations must differ")]
    IdenticalEndpoints,

    /// A station name is not in the network.
    #[error("station {0:?} is not in the network")]
    UnknownStation(String),

    /// Requested transfer count is out of range.
    #[error("max_transfers must be between 0 and {cap}")]
    TransfersOutOfRange { cap: usize },

    /// Requested window is out of range.
    #[error("window_minutes must be between 0 and {cap}")]
    WindowOutOfRange { cap: i64 },

    /// The query exceeded its wall-clock budget.
    #[error("query timed out")]
    Timeout,
}

/// Aggregate numbers describing one answered query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    /// Paths enumerated before any filtering.
    pub total_paths: usize,
    /// Duration of the fastest enumerated path, if any.
    pub fastest_minutes: Option<u32>,
    /// Window applied relative to the fastest.
    pub window_minutes: i64,
    /// Paths surviving the window filter.
    pub filtered_paths: usize,
    /// Merged itineraries returned.
    pub merged_paths: usize,
    /// Hops rejected by the same-station consecutive-transfer policy.
    pub skipped_same_station_transfers: u64,
}

/// The answer to one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    pub paths: Vec<MergedPath>,
    pub summary: PlanSummary,
}

/// Validate a request against the snapshot and configuration.
///
/// Returns the accepted transfer cap for the enumerator.
fn validate(
    snapshot: &Snapshot,
    config: &SearchConfig,
    req: &PlanRequest,
) -> Result<usize, PlanError> {
    if req.start_station.is_empty() || req.end_station.is_empty() {
        return Err(PlanError::MissingEndpoint);
    }
    if req.start_station == req.end_station {
        return Err(PlanError::IdenticalEndpoints);
    }
    if req.max_transfers < 0 || req.max_transfers > config.max_transfers_cap as i64 {
        return Err(PlanError::TransfersOutOfRange {
            cap: config.max_transfers_cap,
        });
    }
    if req.window_minutes < 0 || req.window_minutes > config.max_window_mins {
        return Err(PlanError::WindowOutOfRange {
            cap: config.max_window_mins,
        });
    }
    for station in [&req.start_station, &req.end_station] {
        if !snapshot.schedule().contains_station(station) {
            return Err(PlanError::UnknownStation(station.clone()));
        }
    }
    Ok(req.max_transfers as usize)
}

/// Answer an itinerary query.
///
/// Composes validation, enumeration, window filtering, and the merge.
/// Cancellation (observed between DFS steps) surfaces as
/// [`PlanError::Timeout`].
#[instrument(skip(snapshot, config, cancel), fields(start = %req.start_station, end = %req.end_station))]
pub fn plan(
    snapshot: &Snapshot,
    config: &SearchConfig,
    req: &PlanRequest,
    cancel: &CancelToken,
) -> Result<PlanOutcome, PlanError> {
    let max_transfers = validate(snapshot, config, req)?;

    let search_req = SearchRequest {
        start: &req.start_station,
        end: &req.end_station,
        max_transfers,
        allow_same_station_consecutive_transfers: req.allow_same_station_consecutive_transfers,
    };
    let (all_paths, stats) = search::find_paths(snapshot, &search_req, cancel)
        .map_err(|_cancelled| PlanError::Timeout)?;

    let total_paths = all_paths.len();
    let (mut kept, fastest_minutes) = merge::filter_window(all_paths, req.window_minutes);
    let filtered_paths = kept.len();

    merge::sort_paths(&mut kept);
    let paths = merge::merge_by_train_sequence(kept);

    info!(
        total_paths,
        filtered_paths,
        merged_paths = paths.len(),
        "query answered"
    );
    debug!(?stats, "search counters");

    let summary = PlanSummary {
        total_paths,
        fastest_minutes,
        window_minutes: req.window_minutes,
        filtered_paths,
        merged_paths: paths.len(),
        skipped_same_station_transfers: stats.skipped_same_station_transfers,
    };

    Ok(PlanOutcome { paths, summary })
}
