//! Schedule document parsing and validation.
//!
//! The document format is:
//!
//! ```json
//! { "train": [ { "id": "S4847",
//!                "is_fast": true,
//!                "directionality": [1, 0, -1],
//!                "stops": [ { "station": "...", "time": "HH:MM" } ] } ] }
//! ```
//!
//! `directionality` may be `null` or absent. Stop times must advance
//! strictly, wrapping at most once past midnight.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use crate::domain::{DayMinute, Stop, Train, TrainId};

use super::ScheduleError;

#[derive(Debug, Deserialize)]
struct ScheduleDoc {
    train: Vec<TrainDoc>,
}

#[derive(Debug, Deserialize)]
struct TrainDoc {
    id: String,
    is_fast: bool,
    #[serde(default)]
    directionality: Option<Vec<i8>>,
    stops: Vec<StopDoc>,
}

#[derive(Debug, Deserialize)]
struct StopDoc {
    station: String,
    time: String,
}

/// The validated timetable tables.
///
/// Built once at startup and treated as read-only afterwards.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// All trains, keyed by id. Ordered so that downstream graph
    /// construction is deterministic.
    trains: BTreeMap<TrainId, Train>,
    /// Sorted unique names of every station that appears in any stop list.
    stations: Vec<String>,
    /// Direction vectors for the trains that carry one.
    directions: HashMap<TrainId, Vec<i8>>,
}

impl Schedule {
    /// Parse and validate a schedule document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ScheduleError> {
        let doc: ScheduleDoc = serde_json::from_slice(bytes)?;

        let mut trains = BTreeMap::new();
        let mut stations = BTreeSet::new();
        let mut directions = HashMap::new();

        for (position, train_doc) in doc.train.into_iter().enumerate() {
            let id = TrainId::new(train_doc.id.clone())
                .map_err(|_| ScheduleError::EmptyTrainId { position })?;

            if train_doc.stops.len() < 2 {
                return Err(ScheduleError::TooFewStops {
                    train: train_doc.id,
                });
            }

            let stops = parse_stops(&id, train_doc.stops)?;
            for stop in &stops {
                stations.insert(stop.station.clone());
            }

            if let Some(vector) = &train_doc.directionality {
                directions.insert(id.clone(), vector.clone());
            }

            let train = Train {
                id: id.clone(),
                is_fast: train_doc.is_fast,
                direction: train_doc.directionality,
                stops,
            };

            if trains.insert(id, train).is_some() {
                return Err(ScheduleError::DuplicateTrain(train_doc.id));
            }
        }

        Ok(Self {
            trains,
            stations: stations.into_iter().collect(),
            directions,
        })
    }

    /// All trains in id order.
    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    /// Number of trains.
    pub fn train_count(&self) -> usize {
        self.trains.len()
    }

    /// Look up a train by id.
    pub fn train(&self, id: &TrainId) -> Option<&Train> {
        self.trains.get(id)
    }

    /// Whether a train is a fast service. Unknown ids are slow.
    pub fn is_fast(&self, id: &TrainId) -> bool {
        self.trains.get(id).is_some_and(|t| t.is_fast)
    }

    /// The sorted station directory.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// Is the station name known to the timetable?
    pub fn contains_station(&self, name: &str) -> bool {
        self.stations.binary_search_by(|s| s.as_str().cmp(name)).is_ok()
    }

    /// Direction vectors, for the trains that carry one.
    pub fn directions(&self) -> &HashMap<TrainId, Vec<i8>> {
        &self.directions
    }
}

/// Parse a train's stop list, enforcing strict monotonicity modulo
/// midnight: every leg advances, and the whole service fits in one day.
fn parse_stops(id: &TrainId, docs: Vec<StopDoc>) -> Result<Vec<Stop>, ScheduleError> {
    let mut stops = Vec::with_capacity(docs.len());
    let mut elapsed: u32 = 0;

    for doc in docs {
        let time = DayMinute::parse(&doc.time).map_err(|_| ScheduleError::InvalidTime {
            train: id.as_str().to_string(),
            station: doc.station.clone(),
            value: doc.time.clone(),
        })?;

        if let Some(prev) = stops.last().map(|s: &Stop| s.time) {
            let leg = prev.until(time);
            elapsed += u32::from(leg);
            if leg == 0 || elapsed >= u32::from(DayMinute::DAY) {
                return Err(ScheduleError::NonMonotonicStops {
                    train: id.as_str().to_string(),
                    station: doc.station,
                });
            }
        }

        stops.push(Stop {
            station: doc.station,
            time,
        });
    }

    Ok(stops)
}
