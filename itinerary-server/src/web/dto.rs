//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::planner::{MergedPath, PlanSummary, TransferDetail, TransferOptions};
use crate::snapshot::DataLoaded;

/// Request body for the path endpoint.
///
/// The documented defaults live here: omitted fields become two transfers
/// and a 120-minute window.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub start_station: String,
    pub end_station: String,

    #[serde(default = "default_max_transfers")]
    pub max_transfers: i64,

    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,

    #[serde(default)]
    pub allow_same_station_consecutive_transfers: bool,
}

fn default_max_transfers() -> i64 {
    2
}

fn default_window_minutes() -> i64 {
    120
}

/// One transfer step in a response.
#[derive(Debug, Clone, Serialize)]
pub struct TransferDetailDto {
    pub station: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub wait_minutes: u16,
}

impl TransferDetailDto {
    fn from_detail(detail: &TransferDetail) -> Self {
        Self {
            station: detail.station.clone(),
            arrival_time: detail.arrival_time.clone(),
            departure_time: detail.departure_time.clone(),
            wait_minutes: detail.wait_minutes,
        }
    }
}

/// Alternatives for one transfer step.
#[derive(Debug, Serialize)]
pub struct TransferOptionsDto {
    pub step: usize,
    pub options: Vec<TransferDetailDto>,
}

impl TransferOptionsDto {
    fn from_options(options: &TransferOptions) -> Self {
        Self {
            step: options.step,
            options: options
                .options
                .iter()
                .map(TransferDetailDto::from_detail)
                .collect(),
        }
    }
}

/// One itinerary in a response.
#[derive(Debug, Serialize)]
pub struct PathEntry {
    pub id: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub train_sequence: Vec<String>,
    pub departure_time: String,
    pub arrival_time: String,
    pub total_time: String,
    pub total_minutes: u32,
    pub is_fast: bool,
    pub transfer_count: usize,
    pub transfer_details: Vec<TransferDetailDto>,
    pub transfer_options: Vec<TransferOptionsDto>,
}

impl PathEntry {
    /// Build the wire representation of a merged itinerary.
    pub fn from_merged(path: &MergedPath) -> Self {
        let summary = &path.summary;
        Self {
            id: path.id,
            kind: summary.kind.as_str(),
            train_sequence: summary
                .train_sequence
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            departure_time: summary.departure_time.clone(),
            arrival_time: summary.arrival_time.clone(),
            total_time: summary.total_time(),
            total_minutes: summary.total_minutes,
            is_fast: summary.is_fast,
            transfer_count: summary.transfer_count(),
            transfer_details: summary
                .transfer_details
                .iter()
                .map(TransferDetailDto::from_detail)
                .collect(),
            transfer_options: path
                .transfer_options
                .iter()
                .map(TransferOptionsDto::from_options)
                .collect(),
        }
    }
}

/// Aggregate numbers for one answered query.
#[derive(Debug, Serialize)]
pub struct SummaryDto {
    pub total_paths: usize,
    /// Null when no path was found; the key is always present.
    pub fastest_minutes: Option<u32>,
    pub window_minutes: i64,
    pub filtered_paths: usize,
    pub merged_paths: usize,
    pub skipped_same_station_transfers: u64,
}

impl SummaryDto {
    pub fn from_summary(summary: &PlanSummary) -> Self {
        Self {
            total_paths: summary.total_paths,
            fastest_minutes: summary.fastest_minutes,
            window_minutes: summary.window_minutes,
            filtered_paths: summary.filtered_paths,
            merged_paths: summary.merged_paths,
            skipped_same_station_transfers: summary.skipped_same_station_transfers,
        }
    }
}

/// Request echo and generation metadata.
#[derive(Debug, Serialize)]
pub struct MetadataDto {
    pub max_transfers: i64,
    pub generated_at: String,
}

/// Response body for the path endpoint.
#[derive(Debug, Serialize)]
pub struct PathResponse {
    pub start_station: String,
    pub end_station: String,
    pub paths: Vec<PathEntry>,
    pub summary: SummaryDto,
    pub metadata: MetadataDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Per-structure load flags on the health response.
#[derive(Debug, Serialize)]
pub struct DataLoadedDto {
    pub graph: bool,
    pub schedule: bool,
    pub train_info: bool,
    pub directionality_map: bool,
    pub adjacency: bool,
    pub nodes: bool,
    pub stations_list: bool,
}

impl DataLoadedDto {
    pub fn from_flags(flags: DataLoaded) -> Self {
        Self {
            graph: flags.graph,
            schedule: flags.schedule,
            train_info: flags.train_info,
            directionality_map: flags.directionality_map,
            adjacency: flags.adjacency,
            nodes: flags.nodes,
            stations_list: flags.stations_list,
        }
    }
}

/// Response body for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub data_loaded: DataLoadedDto,
    pub timestamp: String,
}

/// Response body for the station directory endpoint.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<String>,
    pub count: usize,
    pub timestamp: String,
}

/// Error envelope returned with any 4xx/5xx status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
