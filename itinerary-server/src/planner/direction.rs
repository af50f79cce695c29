//! Direction-vector compatibility between connecting trains.
//!
//! Each train may carry a vector of per-line direction signs: +1 forward,
//! -1 reverse, 0 not traversed. Two trains that run the same line in
//! opposite directions do not form a sensible transfer on that line, so a
//! boarding sequence containing such a pair is rejected.

use std::collections::HashMap;

use crate::domain::TrainId;

/// Are two direction vectors compatible?
///
/// They conflict iff some shared line index carries opposing non-zero
/// signs. Lines beyond the shorter vector are ignored.
pub fn vectors_compatible(a: &[i8], b: &[i8]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(&x, &y)| x == 0 || y == 0 || x != -y)
}

/// Check every adjacent pair of a boarding sequence against the direction
/// map. Pairs where either train has no vector are skipped.
pub fn sequence_compatible(trains: &[&TrainId], directions: &HashMap<TrainId, Vec<i8>>) -> bool {
    trains.windows(2).all(|pair| {
        match (directions.get(pair[0]), directions.get(pair[1])) {
            (Some(a), Some(b)) => vectors_compatible(a, b),
            _ => true,
        }
    })
}
