use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::discovery::distance::LatLon;

/// How a coordinate was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GeocodingSource {
    /// Provider match on the full address
    Address,
    /// Provider match on "city, state" only
    CityState,
    /// Random point near the default center
    Synthetic,
}

impl std::fmt::Display for GeocodingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodingSource::Address => write!(f, "address"),
            GeocodingSource::CityState => write!(f, "city_state"),
            GeocodingSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Resolved coordinate, cached in memory only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeocodedPoint {
    pub lat: f64,
    pub lon: f64,
    pub source: GeocodingSource,
}

impl GeocodedPoint {
    pub fn new(position: LatLon, source: GeocodingSource) -> Self {
        Self {
            lat: position.lat,
            lon: position.lon,
            source,
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == GeocodingSource::Synthetic
    }
}
