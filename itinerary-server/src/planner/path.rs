//! Per-itinerary output records.

use crate::domain::{format_duration, TrainId};

/// Itinerary classification: direct ride or one with train changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    Direct,
    Transfer,
}

impl PathKind {
    /// Display name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            PathKind::Direct => "Direct",
            PathKind::Transfer => "Transfer",
        }
    }
}

/// One train change within an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDetail {
    /// Station where the change happens.
    pub station: String,
    /// Arrival at the transfer station, "HH:MM".
    pub arrival_time: String,
    /// Departure of the next train, "HH:MM".
    pub departure_time: String,
    /// Waiting time between the two.
    pub wait_minutes: u16,
}

/// A completed itinerary emitted by the enumerator.
///
/// Times are rendered "HH:MM"; `total_minutes` is the wrapped difference
/// between arrival and departure and equals the sum of edge durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSummary {
    pub kind: PathKind,
    /// Trains in boarding order; no two consecutive entries are equal.
    pub train_sequence: Vec<TrainId>,
    /// One entry per boarding after the first.
    pub transfer_details: Vec<TransferDetail>,
    pub departure_time: String,
    pub arrival_time: String,
    pub total_minutes: u32,
    /// True when any train in the sequence is a fast service.
    pub is_fast: bool,
}

impl PathSummary {
    /// Number of train changes.
    pub fn transfer_count(&self) -> usize {
        self.transfer_details.len()
    }

    /// Duration rendered as "Xh Ym".
    pub fn total_time(&self) -> String {
        format_duration(self.total_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(PathKind::Direct.as_str(), "Direct");
        assert_eq!(PathKind::Transfer.as_str(), "Transfer");
    }

    #[test]
    fn total_time_rendering() {
        let path = PathSummary {
            kind: PathKind::Direct,
            train_sequence: vec![TrainId::new("T1").unwrap()],
            transfer_details: vec![],
            departure_time: "08:00".into(),
            arrival_time: "09:00".into(),
            total_minutes: 60,
            is_fast: false,
        };
        assert_eq!(path.total_time(), "1h 0m");
        assert_eq!(path.transfer_count(), 0);
    }
}
