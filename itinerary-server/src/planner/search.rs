//! Bounded-depth path enumeration over the time-expanded graph.
//!
//! Runs a depth-first walk from every node at the start station, cut by
//! the transfer cap, node uniqueness within a path, and the same-station
//! consecutive-transfer policy. Completed itineraries are checked for
//! direction compatibility and summarized. Because time lives in the
//! nodes, the walk itself never solves a time constraint.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument, warn};

use crate::domain::{format_minutes, DayMinute, TrainId};
use crate::graph::{EdgeKind, NodeId};
use crate::snapshot::Snapshot;

use super::direction::sequence_compatible;
use super::path::{PathKind, PathSummary, TransferDetail};

/// Cooperative cancellation flag observed between DFS steps.
#[derive(Debug, Default)]
pub struct CancelToken(AtomicBool);

impl CancelToken {
    /// Request cancellation; a running search aborts at its next step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Error from path enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The cancellation token fired; partial results are discarded.
    #[error("search cancelled")]
    Cancelled,
}

/// Counters accumulated during one enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// DFS steps taken.
    pub nodes_expanded: u64,
    /// Hops rejected by the same-station consecutive-transfer policy.
    pub skipped_same_station_transfers: u64,
    /// Paths dropped because the accumulated timeline disagreed with the
    /// terminal node's recorded minute.
    pub dropped_inconsistent: u64,
}

/// Enumeration parameters. The facade validates these before calling.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub max_transfers: usize,
    pub allow_same_station_consecutive_transfers: bool,
}

/// Enumerate every feasible itinerary from `start` to `end`.
///
/// Returns the paths sorted ascending by (total_minutes, departure_time)
/// together with the search counters. An unknown start station yields an
/// empty result, not an error.
#[instrument(skip_all, fields(start = req.start, end = req.end, max_transfers = req.max_transfers))]
pub fn find_paths<'a>(
    snapshot: &'a Snapshot,
    req: &'a SearchRequest<'a>,
    cancel: &'a CancelToken,
) -> Result<(Vec<PathSummary>, SearchStats), SearchError> {
    let starts: Vec<NodeId> = snapshot.graph().nodes_at(req.start).collect();
    if starts.is_empty() {
        return Ok((Vec::new(), SearchStats::default()));
    }

    let mut dfs = Dfs {
        snapshot,
        req,
        cancel,
        visited: vec![false; snapshot.graph().nodes.len()],
        trace: Vec::new(),
        trains: Vec::new(),
        start_minute: 0,
        paths: Vec::new(),
        stats: SearchStats::default(),
    };

    for start in starts {
        let node = snapshot.graph().node(start);
        dfs.start_minute = u32::from(node.time.minutes());
        dfs.visited[start.index()] = true;
        dfs.trains.push(&node.train);

        dfs.step(start, 0, None)?;

        dfs.trains.clear();
        dfs.visited[start.index()] = false;
        debug_assert!(dfs.trace.is_empty());
    }

    let Dfs {
        mut paths, stats, ..
    } = dfs;
    paths.sort_by(|a, b| {
        a.total_minutes
            .cmp(&b.total_minutes)
            .then_with(|| a.departure_time.cmp(&b.departure_time))
    });

    debug!(
        paths = paths.len(),
        expanded = stats.nodes_expanded,
        "enumeration complete"
    );
    Ok((paths, stats))
}

/// One traversed edge, kept for summarization.
struct TraceEdge {
    from: NodeId,
    kind: EdgeKind,
    minutes: u16,
}

/// Mutable state of one enumeration.
struct Dfs<'a> {
    snapshot: &'a Snapshot,
    req: &'a SearchRequest<'a>,
    cancel: &'a CancelToken,
    visited: Vec<bool>,
    trace: Vec<TraceEdge>,
    /// Trains in boarding order for the current branch.
    trains: Vec<&'a TrainId>,
    /// Minute of the start node of the current branch.
    start_minute: u32,
    paths: Vec<PathSummary>,
    stats: SearchStats,
}

impl<'a> Dfs<'a> {
    fn step(
        &mut self,
        current: NodeId,
        transfers: usize,
        last_transfer_station: Option<&'a str>,
    ) -> Result<(), SearchError> {
        if self.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        self.stats.nodes_expanded += 1;

        let snap = self.snapshot;
        let node = snap.graph().node(current);

        // The destination is terminal for this branch; an itinerary needs
        // at least one edge.
        if node.station == self.req.end && !self.trace.is_empty() {
            self.emit(current);
            return Ok(());
        }

        for hop in snap.adjacency().outbound(current) {
            if self.visited[hop.to.index()] {
                continue;
            }
            if hop.minutes == 0 {
                continue;
            }

            let next = snap.graph().node(hop.to);
            // The edge kind already records transfers; crossing to another
            // train id over any edge counts as one regardless.
            let is_transfer = hop.kind == EdgeKind::Transfer || next.train != node.train;

            if is_transfer
                && !self.req.allow_same_station_consecutive_transfers
                && last_transfer_station == Some(node.station.as_str())
            {
                self.stats.skipped_same_station_transfers += 1;
                continue;
            }

            let next_transfers = transfers + usize::from(is_transfer);
            if next_transfers > self.req.max_transfers {
                continue;
            }

            let boards_new_train = match self.trains.last() {
                Some(last) => **last != next.train,
                None => true,
            };
            if boards_new_train {
                self.trains.push(&next.train);
            }
            self.visited[hop.to.index()] = true;
            self.trace.push(TraceEdge {
                from: current,
                kind: hop.kind,
                minutes: hop.minutes,
            });

            let next_last_transfer = if is_transfer {
                Some(node.station.as_str())
            } else {
                last_transfer_station
            };
            let outcome = self.step(hop.to, next_transfers, next_last_transfer);

            self.trace.pop();
            self.visited[hop.to.index()] = false;
            if boards_new_train {
                self.trains.pop();
            }
            outcome?;
        }

        Ok(())
    }

    /// Summarize the current branch and record it, unless a direction
    /// conflict or a timeline inconsistency rejects it.
    fn emit(&mut self, terminal: NodeId) {
        let snap = self.snapshot;
        let day = u32::from(DayMinute::DAY);

        let mut timeline = self.start_minute;
        let mut transfer_details = Vec::new();
        for edge in &self.trace {
            let arrived = timeline;
            timeline += u32::from(edge.minutes);
            if edge.kind == EdgeKind::Transfer {
                transfer_details.push(TransferDetail {
                    station: snap.graph().node(edge.from).station.clone(),
                    arrival_time: format_minutes(arrived),
                    departure_time: format_minutes(timeline),
                    wait_minutes: edge.minutes,
                });
            }
        }

        // The accumulated timeline must agree with the terminal node's
        // recorded minute modulo the day length.
        let recorded = u32::from(snap.graph().node(terminal).time.minutes());
        if timeline % day != recorded % day {
            warn!(timeline, recorded, "dropping path with inconsistent timeline");
            self.stats.dropped_inconsistent += 1;
            return;
        }

        if !transfer_details.is_empty()
            && !sequence_compatible(&self.trains, snap.schedule().directions())
        {
            return;
        }

        let kind = if transfer_details.is_empty() {
            PathKind::Direct
        } else {
            PathKind::Transfer
        };
        let is_fast = self.trains.iter().any(|&t| snap.schedule().is_fast(t));
        let train_sequence: Vec<TrainId> = self.trains.iter().map(|&t| t.clone()).collect();

        self.paths.push(PathSummary {
            kind,
            train_sequence,
            transfer_details,
            departure_time: format_minutes(self.start_minute),
            arrival_time: format_minutes(timeline),
            total_minutes: (timeline - self.start_minute) % day,
            is_fast,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TransferPolicy;
    use crate::schedule::Schedule;

    fn snapshot(json: &str, policy: TransferPolicy) -> Snapshot {
        let schedule = Schedule::from_json(json.as_bytes()).unwrap();
        Snapshot::build(schedule, policy)
    }

    fn run(
        snapshot: &Snapshot,
        start: &str,
        end: &str,
        max_transfers: usize,
        allow_same_station: bool,
    ) -> (Vec<PathSummary>, SearchStats) {
        let req = SearchRequest {
            start,
            end,
            max_transfers,
            allow_same_station_consecutive_transfers: allow_same_station,
        };
        find_paths(snapshot, &req, &CancelToken::default()).unwrap()
    }

    #[test]
    fn direct_path_on_single_train() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": true, "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Y", "time": "08:30"},
                    {"station": "Z", "time": "09:00"}
                ]}
            ]}"#,
            TransferPolicy::default(),
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.kind, PathKind::Direct);
        assert_eq!(path.train_sequence.len(), 1);
        assert_eq!(path.train_sequence[0].as_str(), "T1");
        assert_eq!(path.departure_time, "08:00");
        assert_eq!(path.arrival_time, "09:00");
        assert_eq!(path.total_minutes, 60);
        assert_eq!(path.total_time(), "1h 0m");
        assert!(path.is_fast);
        assert_eq!(path.transfer_count(), 0);
        assert!(path.transfer_details.is_empty());
    }

    #[test]
    fn one_transfer_records_detail() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": false, "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Y", "time": "08:30"}
                ]},
                {"id": "T2", "is_fast": false, "stops": [
                    {"station": "Y", "time": "08:40"},
                    {"station": "Z", "time": "09:10"}
                ]}
            ]}"#,
            TransferPolicy {
                min_connect: 5,
                max_wait: 60,
            },
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.kind, PathKind::Transfer);
        assert_eq!(
            path.train_sequence
                .iter()
                .map(TrainId::as_str)
                .collect::<Vec<_>>(),
            ["T1", "T2"]
        );
        assert_eq!(path.departure_time, "08:00");
        assert_eq!(path.arrival_time, "09:10");
        assert_eq!(path.total_minutes, 70);
        assert!(!path.is_fast);
        assert_eq!(path.transfer_count(), 1);

        let detail = &path.transfer_details[0];
        assert_eq!(detail.station, "Y");
        assert_eq!(detail.arrival_time, "08:30");
        assert_eq!(detail.departure_time, "08:40");
        assert_eq!(detail.wait_minutes, 10);
    }

    #[test]
    fn opposing_directions_reject_the_connection() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": false, "directionality": [1, 0], "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Y", "time": "08:30"}
                ]},
                {"id": "T2", "is_fast": false, "directionality": [-1, 0], "stops": [
                    {"station": "Y", "time": "08:40"},
                    {"station": "Z", "time": "09:10"}
                ]}
            ]}"#,
            TransferPolicy {
                min_connect: 5,
                max_wait: 60,
            },
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);
        assert!(paths.is_empty());
    }

    #[test]
    fn directionless_trains_connect_freely() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": false, "directionality": [1, 0], "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Y", "time": "08:30"}
                ]},
                {"id": "T2", "is_fast": false, "stops": [
                    {"station": "Y", "time": "08:40"},
                    {"station": "Z", "time": "09:10"}
                ]}
            ]}"#,
            TransferPolicy {
                min_connect: 5,
                max_wait: 60,
            },
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn same_station_consecutive_transfers_are_skipped() {
        // T1 reaches Y; T2 and T3 both depart Y. Changing T1 -> T2 -> T3
        // without leaving Y is two consecutive transfers at one station.
        let json = r#"{"train": [
            {"id": "T1", "is_fast": false, "stops": [
                {"station": "X", "time": "08:00"},
                {"station": "Y", "time": "08:30"}
            ]},
            {"id": "T2", "is_fast": false, "stops": [
                {"station": "Y", "time": "08:40"},
                {"station": "W", "time": "09:30"}
            ]},
            {"id": "T3", "is_fast": false, "stops": [
                {"station": "Y", "time": "08:50"},
                {"station": "Z", "time": "09:20"}
            ]}
        ]}"#;
        let policy = TransferPolicy {
            min_connect: 5,
            max_wait: 60,
        };

        let snap = snapshot(json, policy);

        let (strict_paths, strict_stats) = run(&snap, "X", "Z", 2, false);
        assert!(strict_stats.skipped_same_station_transfers > 0);
        // Only the single-change itinerary T1 -> T3 survives.
        assert_eq!(strict_paths.len(), 1);
        assert_eq!(strict_paths[0].transfer_count(), 1);

        let (lenient_paths, _) = run(&snap, "X", "Z", 2, true);
        // The T1 -> T2 -> T3 variant (still boarding T3 at Y) is allowed.
        assert!(lenient_paths.len() > strict_paths.len());
        assert!(lenient_paths.iter().any(|p| p.transfer_count() == 2));
    }

    #[test]
    fn transfer_cap_prunes_deep_branches() {
        let json = r#"{"train": [
            {"id": "T1", "is_fast": false, "stops": [
                {"station": "A", "time": "08:00"},
                {"station": "B", "time": "08:20"}
            ]},
            {"id": "T2", "is_fast": false, "stops": [
                {"station": "B", "time": "08:30"},
                {"station": "C", "time": "08:50"}
            ]},
            {"id": "T3", "is_fast": false, "stops": [
                {"station": "C", "time": "09:00"},
                {"station": "D", "time": "09:20"}
            ]}
        ]}"#;
        let policy = TransferPolicy {
            min_connect: 5,
            max_wait: 60,
        };

        let snap = snapshot(json, policy);

        let (paths, _) = run(&snap, "A", "D", 2, false);
        assert_eq!(paths.len(), 1);

        let (paths, _) = run(&snap, "A", "D", 1, false);
        assert!(paths.is_empty());

        let (paths, _) = run(&snap, "A", "C", 1, false);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn destination_is_terminal_per_branch() {
        // T1 passes through Z and continues; T2 could loop back to Z later.
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": false, "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Z", "time": "08:30"},
                    {"station": "Y", "time": "09:00"}
                ]},
                {"id": "T2", "is_fast": false, "stops": [
                    {"station": "Y", "time": "09:10"},
                    {"station": "Z", "time": "09:40"}
                ]}
            ]}"#,
            TransferPolicy {
                min_connect: 5,
                max_wait: 60,
            },
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);

        // Only the first arrival at Z is reported; the branch does not
        // continue through the destination to find the later one.
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].arrival_time, "08:30");
    }

    #[test]
    fn unknown_start_station_yields_empty_result() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": false, "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Y", "time": "08:30"}
                ]}
            ]}"#,
            TransferPolicy::default(),
        );

        let (paths, stats) = run(&snap, "Nowhere", "Y", 2, false);
        assert!(paths.is_empty());
        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn results_sorted_by_duration_then_departure() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "Slow", "is_fast": false, "stops": [
                    {"station": "X", "time": "07:00"},
                    {"station": "Z", "time": "08:30"}
                ]},
                {"id": "Fast", "is_fast": true, "stops": [
                    {"station": "X", "time": "09:00"},
                    {"station": "Z", "time": "09:45"}
                ]},
                {"id": "Late", "is_fast": false, "stops": [
                    {"station": "X", "time": "10:00"},
                    {"station": "Z", "time": "11:30"}
                ]}
            ]}"#,
            // Window too tight for any transfer; three direct rides only.
            TransferPolicy {
                min_connect: 15,
                max_wait: 30,
            },
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);
        let order: Vec<(&str, u32)> = paths
            .iter()
            .map(|p| (p.train_sequence[0].as_str(), p.total_minutes))
            .collect();

        assert_eq!(order, [("Fast", 45), ("Slow", 90), ("Late", 90)]);
    }

    #[test]
    fn cancellation_aborts_the_search() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "T1", "is_fast": false, "stops": [
                    {"station": "X", "time": "08:00"},
                    {"station": "Y", "time": "08:30"}
                ]}
            ]}"#,
            TransferPolicy::default(),
        );

        let cancel = CancelToken::default();
        cancel.cancel();

        let req = SearchRequest {
            start: "X",
            end: "Y",
            max_transfers: 2,
            allow_same_station_consecutive_transfers: false,
        };
        assert_eq!(
            find_paths(&snap, &req, &cancel).unwrap_err(),
            SearchError::Cancelled
        );
    }

    #[test]
    fn midnight_terminus_duration() {
        let snap = snapshot(
            r#"{"train": [
                {"id": "N1", "is_fast": false, "stops": [
                    {"station": "X", "time": "23:30"},
                    {"station": "Z", "time": "00:00"}
                ]}
            ]}"#,
            TransferPolicy::default(),
        );

        let (paths, _) = run(&snap, "X", "Z", 2, false);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].departure_time, "23:30");
        assert_eq!(paths[0].arrival_time, "00:00");
        assert_eq!(paths[0].total_minutes, 30);
    }
}
