//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Default search origin used before the user shares a position (Times Square, NYC).
pub const DEMO_ORIGIN: Coordinate = Coordinate {
    latitude: 40.758_9,
    longitude: -73.985_1,
};

/// A validated WGS84 position.
///
/// Fields are private so every value in circulation has passed the range
/// check in [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("coordinate out of range: latitude={latitude}, longitude={longitude}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting NaN and values outside
    /// `[-90, 90]` latitude / `[-180, 180]` longitude.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] when either component is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine distance to `other` in meters.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlng = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            latitude: f64,
            longitude: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Coordinate::new(raw.latitude, raw.longitude).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range_and_nan() {
        assert!(Coordinate::new(90.01, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert!(DEMO_ORIGIN.distance_to(&DEMO_ORIGIN).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_times_square_to_central_park() {
        let central_park = Coordinate::new(40.785_091, -73.968_285).unwrap();
        let d = DEMO_ORIGIN.distance_to(&central_park);
        // ~3.3 km as the crow flies
        assert!((3_100.0..3_500.0).contains(&d), "got {d}");
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        let err = serde_json::from_value::<Coordinate>(
            serde_json::json!({"latitude": 123.0, "longitude": 0.0}),
        );
        assert!(err.is_err());
    }
}
