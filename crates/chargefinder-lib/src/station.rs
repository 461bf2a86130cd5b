use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// Numeric identifier for a charging station.
pub type StationId = i64;

/// A known charging-station record.
///
/// Provider labels are free text; matching against them is case and
/// whitespace insensitive (see [`crate::rank`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: StationId,
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub provider: String,
}

/// Immutable snapshot of station records for the duration of one query.
///
/// Preserves the caller's input order, which is what makes entry-node
/// tie-breaks and the stable ranking sort deterministic. Construction
/// validates coordinate ranges and rejects duplicate identifiers; the
/// core never mutates the snapshot afterwards.
#[derive(Debug, Clone, Default)]
pub struct StationSet {
    stations: Vec<Location>,
    index: HashMap<StationId, usize>,
}

impl StationSet {
    /// Build a snapshot from station records, keeping input order.
    pub fn new(stations: Vec<Location>) -> Result<Self> {
        let mut index = HashMap::with_capacity(stations.len());
        for (position, station) in stations.iter().enumerate() {
            if !(-90.0..=90.0).contains(&station.coordinates.latitude) {
                return Err(Error::InvalidLatitude {
                    station: station.id,
                    value: station.coordinates.latitude,
                });
            }
            if !(-180.0..=180.0).contains(&station.coordinates.longitude) {
                return Err(Error::InvalidLongitude {
                    station: station.id,
                    value: station.coordinates.longitude,
                });
            }
            if index.insert(station.id, position).is_some() {
                return Err(Error::DuplicateStationId { id: station.id });
            }
        }
        Ok(Self { stations, index })
    }

    /// Lookup a station by identifier.
    pub fn get(&self, id: StationId) -> Option<&Location> {
        self.index.get(&id).map(|&position| &self.stations[position])
    }

    /// Iterate stations in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
