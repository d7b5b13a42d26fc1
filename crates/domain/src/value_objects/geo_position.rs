//! Geographic position value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A geographic position with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoPosition {
    /// Create a new position with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in
    /// [-90, 90] or longitude is not in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinates() {
        let pos = GeoPosition::new(50.4547, 30.5238).expect("valid coordinates");
        assert!((pos.latitude() - 50.4547).abs() < f64::EPSILON);
        assert!((pos.longitude() - 30.5238).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_coordinates() {
        assert!(GeoPosition::new(90.0, 180.0).is_ok());
        assert!(GeoPosition::new(-90.0, -180.0).is_ok());
        assert!(GeoPosition::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn invalid_latitude() {
        assert!(GeoPosition::new(91.0, 0.0).is_err());
        assert!(GeoPosition::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn invalid_longitude() {
        assert!(GeoPosition::new(0.0, 181.0).is_err());
        assert!(GeoPosition::new(0.0, -181.0).is_err());
    }

    #[test]
    fn display_format() {
        let pos = GeoPosition::new(50.4547, 30.5238).expect("valid");
        let display = format!("{pos}");
        assert!(display.contains("50.4547"));
        assert!(display.contains("30.5238"));
    }

    #[test]
    fn serialization_round_trip() {
        let pos = GeoPosition::new(50.4547, 30.5238).expect("valid");
        let json = serde_json::to_string(&pos).expect("serialize");
        let back: GeoPosition = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(pos, back);
    }
}
