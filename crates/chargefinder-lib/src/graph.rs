use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::spatial::SpatialIndex;
use crate::station::{Location, StationId, StationSet};

/// Great-circle distance in kilometres under which two stations are linked.
pub const LINK_RADIUS_KM: f64 = 10.0;

/// Snapshot size at which the KD-tree build pays for itself over the naive
/// O(N²) pairwise pass.
pub const INDEXED_BUILD_THRESHOLD: usize = 256;

/// How the adjacency of a graph was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
    Pairwise,
    Indexed,
}

/// Edge within the proximity graph.
///
/// `distance` is the great-circle distance to the target in kilometres; it is
/// also the edge weight used by the shortest-path solver.
#[derive(Debug, Clone)]
pub struct Edge {
    pub target: StationId,
    pub distance: f64,
}

/// Derived adjacency structure connecting stations within the link radius.
///
/// Keyed by station id, never by structural equality of records. Undirected
/// by construction: edges are always inserted in both directions. Every
/// station in the snapshot appears in the map, isolated stations with an
/// empty edge list.
#[derive(Debug, Clone)]
pub struct ProximityGraph {
    strategy: BuildStrategy,
    adjacency: Arc<HashMap<StationId, Vec<Edge>>>,
}

impl ProximityGraph {
    /// Strategy that produced this graph (pairwise or indexed).
    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    /// Return the neighbours for a given station identifier.
    pub fn neighbours(&self, station: StationId) -> &[Edge] {
        self.adjacency
            .get(&station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over every station id present in the graph.
    pub fn station_ids(&self) -> impl Iterator<Item = StationId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of stations in the graph.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

impl Default for ProximityGraph {
    fn default() -> Self {
        Self {
            strategy: BuildStrategy::Pairwise,
            adjacency: Arc::new(HashMap::new()),
        }
    }
}

/// Options for proximity-graph construction.
#[derive(Debug, Clone)]
pub struct GraphBuildOptions {
    /// Great-circle link radius in kilometres.
    pub link_radius_km: f64,
    /// Pre-built spatial index for faster construction. If `None`, the
    /// indexed builder creates one on demand.
    pub spatial_index: Option<Arc<SpatialIndex>>,
}

impl Default for GraphBuildOptions {
    fn default() -> Self {
        Self {
            link_radius_km: LINK_RADIUS_KM,
            spatial_index: None,
        }
    }
}

/// Build the proximity graph with the naive pairwise pass and the default
/// 10 km link radius.
pub fn build_proximity_graph(stations: &StationSet) -> ProximityGraph {
    ProximityGraph {
        strategy: BuildStrategy::Pairwise,
        adjacency: Arc::new(build_pairwise_adjacency(stations, LINK_RADIUS_KM)),
    }
}

/// Build the proximity graph with the naive pairwise pass and the options'
/// link radius. Any pre-built spatial index on the options is ignored; use
/// [`build_proximity_graph_indexed`] to exploit one.
pub fn build_proximity_graph_with(
    stations: &StationSet,
    options: &GraphBuildOptions,
) -> ProximityGraph {
    ProximityGraph {
        strategy: BuildStrategy::Pairwise,
        adjacency: Arc::new(build_pairwise_adjacency(stations, options.link_radius_km)),
    }
}

/// Build the proximity graph through a KD-tree radius query per station.
///
/// Produces the same adjacency as [`build_proximity_graph`]: candidate
/// distances are recomputed with the haversine formula and filtered with the
/// same strict `<` threshold.
pub fn build_proximity_graph_indexed(
    stations: &StationSet,
    options: &GraphBuildOptions,
) -> ProximityGraph {
    let adjacency = match &options.spatial_index {
        Some(index) => build_indexed_adjacency(stations, index, options.link_radius_km),
        None => {
            let index = SpatialIndex::build(stations);
            build_indexed_adjacency(stations, &index, options.link_radius_km)
        }
    };

    ProximityGraph {
        strategy: BuildStrategy::Indexed,
        adjacency: Arc::new(adjacency),
    }
}

fn build_pairwise_adjacency(
    stations: &StationSet,
    link_radius_km: f64,
) -> HashMap<StationId, Vec<Edge>> {
    let mut adjacency: HashMap<StationId, Vec<Edge>> = stations
        .iter()
        .map(|station| (station.id, Vec::new()))
        .collect();

    let all: Vec<&Location> = stations.iter().collect();
    for (position, a) in all.iter().enumerate() {
        for b in &all[position + 1..] {
            let distance = a.coordinates.distance_to(&b.coordinates);
            if distance < link_radius_km {
                // Insert both directions so the graph is undirected in fact,
                // not just in intent.
                adjacency.entry(a.id).or_default().push(Edge {
                    target: b.id,
                    distance,
                });
                adjacency.entry(b.id).or_default().push(Edge {
                    target: a.id,
                    distance,
                });
            }
        }
    }

    debug!(
        stations = all.len(),
        link_radius_km, "built proximity graph (pairwise)"
    );

    adjacency
}

fn build_indexed_adjacency(
    stations: &StationSet,
    index: &SpatialIndex,
    link_radius_km: f64,
) -> HashMap<StationId, Vec<Edge>> {
    let mut adjacency: HashMap<StationId, Vec<Edge>> = HashMap::with_capacity(stations.len());

    for station in stations.iter() {
        let edges: Vec<Edge> = index
            .within_radius(&station.coordinates, link_radius_km)
            .into_iter()
            .filter(|&(target, distance)| target != station.id && distance < link_radius_km)
            .map(|(target, distance)| Edge { target, distance })
            .collect();
        adjacency.insert(station.id, edges);
    }

    debug!(
        stations = stations.len(),
        link_radius_km, "built proximity graph (indexed)"
    );

    adjacency
}
