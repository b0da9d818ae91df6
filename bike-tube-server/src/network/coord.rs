//! Geographic coordinates.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// Error returned for coordinates that are not finite or out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoord {
    #[error("latitude {0} is not a finite value in [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is not a finite value in [-180, 180]")]
    Longitude(f64),
}

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check both components are finite and in range.
    pub fn validate(&self) -> Result<(), InvalidCoord> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidCoord::Latitude(self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(InvalidCoord::Longitude(self.lon));
        }
        Ok(())
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &Coord) -> f64 {
        self.to_point().haversine_distance(&other.to_point()) / 1000.0
    }

    /// As a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// As a GeoJSON-ordered `[lon, lat]` pair.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_ranges() {
        assert!(Coord::new(51.5, -0.12).validate().is_ok());
        assert_eq!(
            Coord::new(91.0, 0.0).validate(),
            Err(InvalidCoord::Latitude(91.0))
        );
        assert!(Coord::new(0.0, -180.5).validate().is_err());
        assert!(Coord::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coord::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn distance_between_london_landmarks() {
        // Trafalgar Square to Parliament Square is a little under 1 km.
        let trafalgar = Coord::new(51.5074, -0.1278);
        let parliament = Coord::new(51.4994, -0.1270);
        let d = trafalgar.distance_km(&parliament);
        assert!(d > 0.8 && d < 1.0, "distance was {d}");
        assert_eq!(trafalgar.distance_km(&trafalgar), 0.0);
    }

    #[test]
    fn lon_lat_order() {
        assert_eq!(Coord::new(51.0, -0.5).lon_lat(), [-0.5, 51.0]);
    }
}
