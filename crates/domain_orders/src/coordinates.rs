//! Geographic coordinates for order endpoints

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while reading a coordinate pair
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatesError {
    #[error("{field} must have 2 coordinates")]
    WrongArity { field: String },

    #[error("{field} coordinates must be numeric")]
    NotNumeric { field: String },

    #[error("{field} latitude must be between -90 and 90")]
    LatitudeOutOfRange { field: String },

    #[error("{field} longitude must be between -180 and 180")]
    LongitudeOutOfRange { field: String },
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, checking the value ranges
    pub fn new(latitude: f64, longitude: f64, field: &str) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange { field: field.to_string() });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange { field: field.to_string() });
        }
        Ok(Self { latitude, longitude })
    }

    /// Parses a `[lat, lng]` pair of decimal strings
    ///
    /// # Arguments
    ///
    /// * `field` - Name used in error messages (e.g. "Origin")
    /// * `pair` - The raw coordinate strings
    pub fn parse<S: AsRef<str>>(field: &str, pair: &[S]) -> Result<Self, CoordinatesError> {
        let [lat, lng] = pair else {
            return Err(CoordinatesError::WrongArity { field: field.to_string() });
        };

        let parse = |raw: &S| {
            raw.as_ref()
                .trim()
                .parse::<f64>()
                .map_err(|_| CoordinatesError::NotNumeric { field: field.to_string() })
        };

        Self::new(parse(lat)?, parse(lng)?, field)
    }
}

/// Formats as `lat,lng`, the form distance services accept
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
