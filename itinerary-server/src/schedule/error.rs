//! Schedule loader error types.

/// Errors raised while loading and validating the schedule document.
///
/// Any of these aborts startup; a schedule that loads is fully valid.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The document is not valid JSON or is missing required fields.
    #[error("malformed schedule document: {0}")]
    Json(#[from] serde_json::Error),

    /// A train id appears more than once.
    #[error("duplicate train id {0:?}")]
    DuplicateTrain(String),

    /// A train id is empty.
    #[error("train at position {position} has an empty id")]
    EmptyTrainId { position: usize },

    /// A train has fewer than two stops.
    #[error("train {train}: a service needs at least two stops")]
    TooFewStops { train: String },

    /// A stop time failed to parse.
    #[error("train {train}: invalid time {value:?} at {station}")]
    InvalidTime {
        train: String,
        station: String,
        value: String,
    },

    /// Stop times do not advance, or the service spans more than a day.
    #[error("train {train}: stops are not monotonic at {station}")]
    NonMonotonicStops { train: String, station: String },
}
