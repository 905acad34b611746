//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// Number of decimal places kept on both axes.
pub const COORDINATE_PRECISION: i32 = 5;

/// A latitude/longitude pair in decimal degrees.
///
/// Both axes are rounded to [`COORDINATE_PRECISION`] places on construction so
/// that equal inputs from different providers compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_axis(latitude),
            longitude: round_axis(longitude),
        }
    }

    /// Builds a coordinate only when both axes are finite and in range.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then(|| Self::new(latitude, longitude))
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parses `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lon\", got \"{s}\""))?;
        let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
        let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude: {e}"))?;
        Self::checked(lat, lon).ok_or_else(|| format!("coordinate out of range: {s}"))
    }
}

fn round_axis(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    (value * scale).round() / scale
}
