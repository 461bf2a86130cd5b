use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::ProximityGraph;
use crate::station::StationId;

/// Finalized single-source shortest-path distances over a proximity graph.
///
/// Query-scoped: built by [`shortest_paths`] and discarded once the ranking
/// that consumed it completes. Stations unreachable from the entry node keep
/// a distance of `f64::INFINITY` and no predecessor.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    entry: StationId,
    distances: HashMap<StationId, f64>,
    predecessors: HashMap<StationId, Option<StationId>>,
}

impl DistanceTable {
    /// The entry station the distances are measured from.
    pub fn entry(&self) -> StationId {
        self.entry
    }

    /// Shortest graph distance from the entry node in kilometres.
    ///
    /// `f64::INFINITY` for unreachable or unknown stations.
    pub fn distance_km(&self, station: StationId) -> f64 {
        self.distances.get(&station).copied().unwrap_or(f64::INFINITY)
    }

    pub fn is_reachable(&self, station: StationId) -> bool {
        self.distance_km(station).is_finite()
    }

    /// Predecessor on the shortest path, `None` for the entry node itself
    /// and for unreachable stations.
    pub fn predecessor(&self, station: StationId) -> Option<StationId> {
        self.predecessors.get(&station).copied().flatten()
    }

    /// Reconstruct the shortest path from the entry node to `station`.
    ///
    /// Returns `None` when the station is unreachable.
    pub fn path_to(&self, station: StationId) -> Option<Vec<StationId>> {
        if !self.is_reachable(station) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = Some(station);
        while let Some(node) = current {
            path.push(node);
            if node == self.entry {
                break;
            }
            current = self.predecessors.get(&node).copied().flatten();
        }
        path.reverse();
        Some(path)
    }
}

/// Run Dijkstra's algorithm from `entry` until the frontier is exhausted,
/// producing the final distance for every station in the graph.
///
/// Edge weights are the stored great-circle distances, which are never
/// negative, so plain relaxation is correct. The frontier is a min-heap with
/// lazy deletion: a station may be queued multiple times, and entries whose
/// cost exceeds the authoritative table value are skipped on extraction.
pub fn shortest_paths(graph: &ProximityGraph, entry: StationId) -> DistanceTable {
    let mut distances: HashMap<StationId, f64> = graph
        .station_ids()
        .map(|station| (station, f64::INFINITY))
        .collect();
    let mut predecessors: HashMap<StationId, Option<StationId>> =
        graph.station_ids().map(|station| (station, None)).collect();
    let mut queue = BinaryHeap::new();

    distances.insert(entry, 0.0);
    predecessors.entry(entry).or_insert(None);
    queue.push(QueueEntry::new(entry, 0.0));

    while let Some(item) = queue.pop() {
        let settled = distances.get(&item.station).copied().unwrap_or(f64::INFINITY);
        if item.cost.0 > settled {
            // Stale entry superseded by a later relaxation.
            continue;
        }

        for edge in graph.neighbours(item.station) {
            let candidate = settled + edge.distance;
            if candidate < distances.get(&edge.target).copied().unwrap_or(f64::INFINITY) {
                distances.insert(edge.target, candidate);
                predecessors.insert(edge.target, Some(item.station));
                queue.push(QueueEntry::new(edge.target, candidate));
            }
        }
    }

    DistanceTable {
        entry,
        distances,
        predecessors,
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    station: StationId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(station: StationId, cost: f64) -> Self {
        Self {
            station,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::graph::build_proximity_graph;
    use crate::station::{Location, StationSet};

    fn station(id: StationId, latitude: f64, longitude: f64) -> Location {
        Location {
            id,
            name: format!("Station {id}"),
            coordinates: Coordinates::new(latitude, longitude),
            provider: "Volt".to_string(),
        }
    }

    fn chain_set() -> StationSet {
        // 1 -- 2 -- 3 along a meridian; 1 and 3 are ~11.1 km apart, over the
        // link radius, so 3 is only reachable through 2. Station 4 is far out.
        StationSet::new(vec![
            station(1, 0.00, 0.0),
            station(2, 0.05, 0.0),
            station(3, 0.10, 0.0),
            station(4, 3.00, 0.0),
        ])
        .expect("valid snapshot")
    }

    #[test]
    fn distances_accumulate_along_the_chain() {
        let set = chain_set();
        let table = shortest_paths(&build_proximity_graph(&set), 1);

        assert_eq!(table.entry(), 1);
        assert_eq!(table.distance_km(1), 0.0);
        assert!((table.distance_km(2) - 5.56).abs() < 0.05);
        assert!((table.distance_km(3) - 11.12).abs() < 0.1);
        assert_eq!(table.predecessor(3), Some(2));
    }

    #[test]
    fn unreachable_station_keeps_infinite_distance() {
        let set = chain_set();
        let table = shortest_paths(&build_proximity_graph(&set), 1);

        assert!(!table.is_reachable(4));
        assert_eq!(table.distance_km(4), f64::INFINITY);
        assert_eq!(table.predecessor(4), None);
        assert!(table.path_to(4).is_none());
    }

    #[test]
    fn path_reconstruction_walks_predecessors() {
        let set = chain_set();
        let table = shortest_paths(&build_proximity_graph(&set), 1);

        assert_eq!(table.path_to(3), Some(vec![1, 2, 3]));
        assert_eq!(table.path_to(1), Some(vec![1]));
    }

    #[test]
    fn stale_queue_entries_are_skipped() {
        // Station 4 is first queued through 2 (longer total) and later
        // improved through 3, leaving a stale heap entry behind.
        //   1 -> 2: ~6.9 km   2 -> 4: ~8.7 km   (total ~15.5)
        //   1 -> 3: ~9.0 km   3 -> 4: ~5.0 km   (total ~14.0)
        let set = StationSet::new(vec![
            station(1, 0.0000, 0.0000),
            station(2, 0.0300, 0.0540),
            station(3, 0.0000, 0.0810),
            station(4, 0.0000, 0.1260),
        ])
        .expect("valid snapshot");

        let table = shortest_paths(&build_proximity_graph(&set), 1);

        assert!((table.distance_km(4) - 14.0).abs() < 0.1);
        assert_eq!(table.predecessor(4), Some(3));
        assert_eq!(table.path_to(4), Some(vec![1, 3, 4]));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let set = chain_set();
        let graph = build_proximity_graph(&set);
        let first = shortest_paths(&graph, 1);
        let second = shortest_paths(&graph, 1);

        for id in [1, 2, 3, 4] {
            assert_eq!(first.distance_km(id).to_bits(), second.distance_km(id).to_bits());
            assert_eq!(first.predecessor(id), second.predecessor(id));
        }
    }
}
