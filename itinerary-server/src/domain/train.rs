//! Train and stop types.
//!
//! A `Train` is one scheduled service: an identifier, a fast/slow flag, an
//! optional per-line direction vector, and an ordered list of stops. Stop
//! monotonicity is enforced by the schedule loader, not here.

use std::fmt;

use super::DayMinute;

/// Error returned when constructing an invalid train id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train id: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// An opaque train identifier.
///
/// Identifiers come from the schedule document and are only required to be
/// non-empty; the planner treats them as atoms.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::TrainId;
///
/// let id = TrainId::new("S4847").unwrap();
/// assert_eq!(id.as_str(), "S4847");
///
/// assert!(TrainId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(String);

impl TrainId {
    /// Create a train id from a non-empty string.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidTrainId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidTrainId {
                reason: "must be non-empty",
            });
        }
        Ok(Self(s))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scheduled stop: a station name and the minute the train is there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Station display name.
    pub station: String,
    /// Minute of day at this station.
    pub time: DayMinute,
}

/// One scheduled train service.
#[derive(Debug, Clone)]
pub struct Train {
    /// Unique identifier.
    pub id: TrainId,
    /// Whether this is a fast (limited-stop) service.
    pub is_fast: bool,
    /// Per-line direction vector: for each named line, +1 forward,
    /// -1 reverse, 0 not traversed. Absent for trains without line data.
    pub direction: Option<Vec<i8>>,
    /// Ordered stops; at least two, strictly monotonic modulo midnight.
    pub stops: Vec<Stop>,
}

impl Train {
    /// The first stop of the service.
    pub fn origin(&self) -> &Stop {
        // Loader guarantees at least two stops.
        &self.stops[0]
    }

    /// The last stop of the service.
    pub fn terminus(&self) -> &Stop {
        &self.stops[self.stops.len() - 1]
    }

    /// Does this service call at the given station?
    pub fn calls_at(&self, station: &str) -> bool {
        self.stops.iter().any(|s| s.station == station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(station: &str, time: &str) -> Stop {
        Stop {
            station: station.to_string(),
            time: DayMinute::parse(time).unwrap(),
        }
    }

    #[test]
    fn train_id_rejects_empty() {
        assert!(TrainId::new("").is_err());
        assert!(TrainId::new("T1").is_ok());
    }

    #[test]
    fn train_id_display() {
        let id = TrainId::new("S4847").unwrap();
        assert_eq!(id.to_string(), "S4847");
        assert_eq!(format!("{:?}", id), "TrainId(S4847)");
    }

    #[test]
    fn origin_and_terminus() {
        let train = Train {
            id: TrainId::new("T1").unwrap(),
            is_fast: false,
            direction: None,
            stops: vec![stop("A", "08:00"), stop("B", "08:30"), stop("C", "09:00")],
        };

        assert_eq!(train.origin().station, "A");
        assert_eq!(train.terminus().station, "C");
        assert!(train.calls_at("B"));
        assert!(!train.calls_at("D"));
    }
}
