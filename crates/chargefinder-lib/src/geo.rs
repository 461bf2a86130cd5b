use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinates for a charging station, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Calculate the great-circle distance to another coordinate pair in
    /// kilometres using the haversine formula.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat_delta = (other.latitude - self.latitude).to_radians();
        let lon_delta = (other.longitude - self.longitude).to_radians();

        let a = (lat_delta / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (lon_delta / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Project onto Earth-radius-scaled 3D Cartesian coordinates.
    ///
    /// Straight-line distance between two projected points is the chord of
    /// their great-circle arc, which is what the KD-tree range query measures.
    pub fn to_cartesian_km(&self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        [
            EARTH_RADIUS_KM * lat.cos() * lon.cos(),
            EARTH_RADIUS_KM * lat.cos() * lon.sin(),
            EARTH_RADIUS_KM * lat.sin(),
        ]
    }
}

/// Convert a great-circle distance into the equivalent chord length.
///
/// Monotonic, so a chord-radius KD-tree query captures exactly the points
/// within the great-circle radius.
pub fn great_circle_to_chord_km(distance_km: f64) -> f64 {
    2.0 * EARTH_RADIUS_KM * (distance_km / (2.0 * EARTH_RADIUS_KM)).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let point = Coordinates::new(52.52, 13.405);
        assert_eq!(point.distance_to(&point), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(52.52, 13.405);
        let b = Coordinates::new(48.8566, 2.3522);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let distance = a.distance_to(&b);
        assert!((distance - 111.19).abs() < 0.1, "got {distance}");
    }

    #[test]
    fn triangle_inequality_holds() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 1.0);
        let c = Coordinates::new(2.0, 0.5);
        assert!(a.distance_to(&c) <= a.distance_to(&b) + b.distance_to(&c) + 1e-9);
    }

    #[test]
    fn collinear_points_are_additive() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let c = Coordinates::new(2.0, 0.0);
        let direct = a.distance_to(&c);
        let via_b = a.distance_to(&b) + b.distance_to(&c);
        assert!((direct - via_b).abs() < 1e-6);
    }

    #[test]
    fn chord_is_shorter_than_arc() {
        let chord = great_circle_to_chord_km(10.0);
        assert!(chord < 10.0);
        // At city scale the chord and the arc are practically identical.
        assert!((chord - 10.0).abs() < 1e-3);
    }

    #[test]
    fn cartesian_chord_matches_converted_arc() {
        let a = Coordinates::new(52.52, 13.405);
        let b = Coordinates::new(52.55, 13.45);
        let pa = a.to_cartesian_km();
        let pb = b.to_cartesian_km();
        let chord = ((pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2) + (pa[2] - pb[2]).powi(2))
            .sqrt();
        let expected = great_circle_to_chord_km(a.distance_to(&b));
        assert!((chord - expected).abs() < 1e-6);
    }
}
