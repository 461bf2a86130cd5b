//! chargefinder library entry points.
//!
//! This crate ranks known charging stations for a provider by shortest-path
//! proximity to a caller-supplied coordinate. It exposes helpers to build an
//! immutable station snapshot, derive the proximity graph, solve single-source
//! shortest paths, and run the combined ranking query. Higher-level consumers
//! (services, CLIs) should depend on the functions exported here instead of
//! reimplementing behavior; persistence and transport stay on their side of
//! the boundary.

#![deny(warnings)]

pub mod error;
pub mod geo;
pub mod graph;
pub mod path;
pub mod rank;
pub mod spatial;
pub mod station;

pub use error::{Error, Result};
pub use geo::{Coordinates, EARTH_RADIUS_KM};
pub use graph::{
    build_proximity_graph, build_proximity_graph_indexed, build_proximity_graph_with,
    BuildStrategy, Edge, GraphBuildOptions, ProximityGraph, LINK_RADIUS_KM,
};
pub use path::{shortest_paths, DistanceTable};
pub use rank::{
    closest_station, rank_nearest_by_provider, rank_nearest_by_provider_with, RankObserver,
    RankRequest, RankedStation, TracingObserver,
};
pub use spatial::SpatialIndex;
pub use station::{Location, StationId, StationSet};
