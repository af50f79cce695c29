//! Post-processing: window filter, ordering, and merge by train sequence.
//!
//! Enumerations that board the same trains at the same times differ only
//! in where the change happens. Merging collapses them into one itinerary
//! carrying the alternatives as per-step transfer options.

use std::collections::HashMap;

use crate::domain::TrainId;

use super::path::{PathKind, PathSummary, TransferDetail};

/// Alternatives observed for one transfer step across merged itineraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// 1-based transfer step.
    pub step: usize,
    /// Distinct (station, arrival, departure, wait) realizations.
    pub options: Vec<TransferDetail>,
}

/// A merged itinerary: the representative summary plus per-step options.
///
/// The representative's timing fields are preserved exactly; merging only
/// grows the option lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPath {
    /// 1-based position in the final ranking.
    pub id: usize,
    pub summary: PathSummary,
    pub transfer_options: Vec<TransferOptions>,
}

/// Keep itineraries within `window` minutes of the fastest.
///
/// Returns the fastest duration alongside the survivors. A negative
/// window is treated as zero; the boundary is inclusive.
pub fn filter_window(paths: Vec<PathSummary>, window: i64) -> (Vec<PathSummary>, Option<u32>) {
    let Some(fastest) = paths.iter().map(|p| p.total_minutes).min() else {
        return (Vec::new(), None);
    };
    let cutoff = u64::from(fastest) + window.max(0) as u64;
    let kept = paths
        .into_iter()
        .filter(|p| u64::from(p.total_minutes) <= cutoff)
        .collect();
    (kept, Some(fastest))
}

/// Stable sort ascending by (total_minutes, departure_time).
pub fn sort_paths(paths: &mut [PathSummary]) {
    paths.sort_by(|a, b| {
        a.total_minutes
            .cmp(&b.total_minutes)
            .then_with(|| a.departure_time.cmp(&b.departure_time))
    });
}

/// Grouping key: itineraries that agree on all of these are one offer.
#[derive(PartialEq, Eq, Hash)]
struct MergeKey {
    train_sequence: Vec<TrainId>,
    kind: PathKind,
    transfer_count: usize,
    departure_time: String,
    arrival_time: String,
    total_minutes: u32,
}

impl MergeKey {
    fn of(path: &PathSummary) -> Self {
        Self {
            train_sequence: path.train_sequence.clone(),
            kind: path.kind,
            transfer_count: path.transfer_count(),
            departure_time: path.departure_time.clone(),
            arrival_time: path.arrival_time.clone(),
            total_minutes: path.total_minutes,
        }
    }
}

/// Merge itineraries sharing a key, collapsing transfer detail into
/// per-step option lists, and assign ids 1..N in the resulting order.
///
/// The first path of each group (in input order) is the representative;
/// its `transfer_details` stay in place as the first option of each step.
pub fn merge_by_train_sequence(paths: Vec<PathSummary>) -> Vec<MergedPath> {
    let mut merged: Vec<MergedPath> = Vec::new();
    let mut groups: HashMap<MergeKey, usize> = HashMap::new();

    for path in paths {
        let key = MergeKey::of(&path);
        match groups.get(&key) {
            None => {
                groups.insert(key, merged.len());
                let transfer_options = path
                    .transfer_details
                    .iter()
                    .enumerate()
                    .map(|(i, detail)| TransferOptions {
                        step: i + 1,
                        options: vec![detail.clone()],
                    })
                    .collect();
                merged.push(MergedPath {
                    id: 0,
                    summary: path,
                    transfer_options,
                });
            }
            Some(&index) => {
                let entry = &mut merged[index];
                for (step, detail) in path.transfer_details.into_iter().enumerate() {
                    let options = &mut entry.transfer_options[step].options;
                    if !options.contains(&detail) {
                        options.push(detail);
                    }
                }
            }
        }
    }

    for (index, path) in merged.iter_mut().enumerate() {
        path.id = index + 1;
    }
    merged
}
