use thiserror::Error;

use crate::station::StationId;

/// Convenient result alias for the chargefinder library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Ranking itself is total and never fails; errors can only arise at the
/// snapshot boundary where the caller hands station records over.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a station record carries a latitude outside -90..90 degrees.
    #[error("station {station} has latitude {value} outside -90..90 degrees")]
    InvalidLatitude { station: StationId, value: f64 },

    /// Raised when a station record carries a longitude outside -180..180 degrees.
    #[error("station {station} has longitude {value} outside -180..180 degrees")]
    InvalidLongitude { station: StationId, value: f64 },

    /// Raised when two station records share an identifier. The graph and the
    /// distance table are keyed by id, so duplicates would silently merge.
    #[error("duplicate station id: {id}")]
    DuplicateStationId { id: StationId },
}
