use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Wire shape of a coordinate: `{ "lat": .., "lng": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A validated WGS84 position. Latitude is always within [-90, 90] and
/// longitude within [-180, 180]; NaN is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLng", into = "LatLng")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Only for values already known to be in range (config constants, projection output).
    pub(crate) const fn raw(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<LatLng> for Coordinate {
    type Error = GeoError;

    fn try_from(value: LatLng) -> Result<Self, Self::Error> {
        Coordinate::new(value.lat, value.lng)
    }
}

impl From<Coordinate> for LatLng {
    fn from(value: Coordinate) -> Self {
        LatLng {
            lat: value.latitude,
            lng: value.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, GeoError};

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.5))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            Coordinate::new(0.0, -180.25),
            Err(GeoError::LongitudeOutOfRange(-180.25))
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn serializes_as_lat_lng_object() {
        let c = Coordinate::new(1.381497, 103.955574).unwrap();
        let json = serde_json::to_value(c).unwrap();
        assert_eq!(json, serde_json::json!({ "lat": 1.381497, "lng": 103.955574 }));
    }

    #[test]
    fn deserializing_out_of_range_fails() {
        let parsed: Result<Coordinate, _> = serde_json::from_str(r#"{"lat": 123.0, "lng": 0.0}"#);
        assert!(parsed.is_err());
    }
}
