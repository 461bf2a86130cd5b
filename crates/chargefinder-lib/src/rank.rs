//! Proximity ranking: entry-node selection, provider filtering, and the
//! public `rank_nearest_by_provider` entry point.
//!
//! The pipeline runs three stages over an immutable snapshot: build the
//! proximity graph, solve single-source shortest paths from the station
//! closest to the query point, then filter by provider and sort ascending by
//! graph distance. Every boundary case (empty snapshot, no entry node, no
//! provider match) degrades to an empty result rather than an error; an
//! empty result is always a valid answer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::geo::Coordinates;
use crate::graph::{
    build_proximity_graph_indexed, build_proximity_graph_with, GraphBuildOptions, ProximityGraph,
    INDEXED_BUILD_THRESHOLD,
};
use crate::path::shortest_paths;
use crate::spatial::SpatialIndex;
use crate::station::{Location, StationSet};

/// Observer for notable conditions encountered during a ranking query.
///
/// Diagnostics are side-channel behaviour, not part of the functional
/// contract: implementations must not influence the returned ranking. All
/// methods default to no-ops.
pub trait RankObserver {
    /// The snapshot contained no stations at all.
    fn empty_snapshot(&self) {}

    /// No entry station could be selected for the query point.
    fn no_entry_node(&self) {}

    /// No station matched the provider filter.
    fn no_provider_match(&self, filter: &str) {
        let _ = filter;
    }
}

/// Default observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RankObserver for TracingObserver {
    fn empty_snapshot(&self) {
        warn!("no stations in the snapshot");
    }

    fn no_entry_node(&self) {
        warn!("no valid entry station found");
    }

    fn no_provider_match(&self, filter: &str) {
        info!(filter, "no charger found for provider");
    }
}

/// A ranking query: caller position plus provider filter.
#[derive(Debug, Clone)]
pub struct RankRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Matched case and whitespace insensitively as a substring of the
    /// provider label. An empty filter matches every provider (the empty
    /// string is a substring of everything).
    pub provider_filter: String,
    pub options: GraphBuildOptions,
}

impl RankRequest {
    /// Convenience constructor with default graph-build options.
    pub fn new(latitude: f64, longitude: f64, provider_filter: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            provider_filter: provider_filter.into(),
            options: GraphBuildOptions::default(),
        }
    }

    /// Attach a pre-built spatial index to the request.
    pub fn with_spatial_index(mut self, index: Arc<SpatialIndex>) -> Self {
        self.options.spatial_index = Some(index);
        self
    }
}

/// One ranked match returned by the query.
#[derive(Debug, Clone, Serialize)]
pub struct RankedStation {
    pub station: Location,
    /// Shortest graph distance from the entry node in kilometres; `None`
    /// when the station is unreachable from the entry node.
    pub distance_km: Option<f64>,
}

impl RankedStation {
    pub fn is_reachable(&self) -> bool {
        self.distance_km.is_some()
    }
}

/// Select the station geometrically closest to the query point.
///
/// Returns `None` only for an empty snapshot. Ties resolve to the first
/// station in snapshot order, which keeps the pick deterministic.
pub fn closest_station<'a>(stations: &'a StationSet, point: &Coordinates) -> Option<&'a Location> {
    let mut best: Option<(&Location, f64)> = None;
    for station in stations.iter() {
        let distance = point.distance_to(&station.coordinates);
        match best {
            Some((_, current)) if distance >= current => {}
            _ => best = Some((station, distance)),
        }
    }
    best.map(|(station, _)| station)
}

/// Rank stations matching the provider filter by shortest graph distance
/// from the station nearest to the query point.
///
/// Diagnostics are reported through the default [`TracingObserver`]; see
/// [`rank_nearest_by_provider_with`] to supply your own.
pub fn rank_nearest_by_provider(
    stations: &StationSet,
    request: &RankRequest,
) -> Vec<RankedStation> {
    rank_nearest_by_provider_with(stations, request, &TracingObserver)
}

/// Rank stations, reporting notable conditions to the supplied observer.
///
/// Pipeline:
/// 1. Select the entry node closest to the query point.
/// 2. Build the proximity graph (indexed for large snapshots).
/// 3. Solve single-source shortest paths from the entry node.
/// 4. Filter by provider and stable-sort ascending by distance, with
///    unreachable stations last in their relative input order.
pub fn rank_nearest_by_provider_with(
    stations: &StationSet,
    request: &RankRequest,
    observer: &dyn RankObserver,
) -> Vec<RankedStation> {
    if stations.is_empty() {
        observer.empty_snapshot();
        return Vec::new();
    }

    let filter = normalize(&request.provider_filter);
    let query_point = Coordinates::new(request.latitude, request.longitude);

    let Some(entry) = closest_station(stations, &query_point) else {
        observer.no_entry_node();
        return Vec::new();
    };

    let graph = select_graph(stations, &request.options);
    let table = shortest_paths(&graph, entry.id);

    let mut ranked: Vec<RankedStation> = stations
        .iter()
        .filter(|station| normalize(&station.provider).contains(&filter))
        .map(|station| {
            let distance = table.distance_km(station.id);
            RankedStation {
                station: station.clone(),
                distance_km: distance.is_finite().then_some(distance),
            }
        })
        .collect();

    // Stable sort keeps input order among equal distances and among the
    // unreachable tail.
    ranked.sort_by(|a, b| {
        sort_key(a)
            .partial_cmp(&sort_key(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if ranked.is_empty() {
        observer.no_provider_match(&filter);
    }

    ranked
}

fn select_graph(stations: &StationSet, options: &GraphBuildOptions) -> ProximityGraph {
    if options.spatial_index.is_some() || stations.len() >= INDEXED_BUILD_THRESHOLD {
        build_proximity_graph_indexed(stations, options)
    } else {
        build_proximity_graph_with(stations, options)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn sort_key(entry: &RankedStation) -> f64 {
    entry.distance_km.unwrap_or(f64::INFINITY)
}
