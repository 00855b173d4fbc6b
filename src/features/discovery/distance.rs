//! Great-circle distance in miles and radius filtering.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Haversine distance between two points, in miles
pub fn haversine_miles(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Keep items within `radius_miles` of `origin`. No origin means no filtering.
pub fn within_radius<T, F>(
    origin: Option<LatLon>,
    items: Vec<T>,
    radius_miles: f64,
    position: F,
) -> Vec<T>
where
    F: Fn(&T) -> Option<LatLon>,
{
    let Some(origin) = origin else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| position(item).is_some_and(|p| haversine_miles(origin, p) <= radius_miles))
        .collect()
}
