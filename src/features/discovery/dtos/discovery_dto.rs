use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::discovery::distance::LatLon;
use crate::features::discovery::models::{GeocodedPoint, GeocodingSource};
use crate::features::vendors::models::Vendor;

/// Query parameters for the vendor list and map
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[validate(schema(function = "validate_user_location"))]
pub struct DiscoverySearchQuery {
    /// Comma-separated categories, e.g. "Hair,Nails"
    pub categories: Option<String>,

    /// Comma-separated `category:sub` pairs, e.g. "Hair:Color,Hair:Wax"
    pub sub_tags: Option<String>,

    /// Case-insensitive substring of the vendor's city or state
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    /// User latitude; requires `lon`
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    /// User longitude; requires `lat`
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lon: Option<f64>,

    /// Search radius in miles around the user location (default: 25)
    #[validate(range(min = 0.1, max = 500.0, message = "Radius must be between 0.1 and 500 miles"))]
    pub radius_miles: Option<f64>,

    /// Vendor to center the map on, when it has a marker
    pub focus_vendor_id: Option<Uuid>,
}

fn validate_user_location(query: &DiscoverySearchQuery) -> Result<(), ValidationError> {
    if query.lat.is_some() != query.lon.is_some() {
        return Err(ValidationError::new("location")
            .with_message("lat and lon must be given together".into()));
    }
    Ok(())
}

impl DiscoverySearchQuery {
    pub fn user_location(&self) -> Option<LatLon> {
        Some(LatLon::new(self.lat?, self.lon?))
    }
}

/// Free-form address to geocode
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct GeocodeQuery {
    #[validate(length(min = 1, max = 300, message = "Address is required"))]
    pub address: String,
}

/// One vendor in the list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorCardDto {
    pub vendor_id: Uuid,
    pub business_name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub tags: Vec<String>,
    /// First gallery image
    pub image: Option<String>,
    pub offers_home: bool,
    pub offers_drive: bool,
    /// Present when a user location was given and the vendor was located
    pub distance_miles: Option<f64>,
    /// Absent when the vendor could not be placed on the map
    pub position: Option<GeocodedPoint>,
}

impl VendorCardDto {
    pub fn new(vendor: &Vendor, position: Option<GeocodedPoint>, distance_miles: Option<f64>) -> Self {
        Self {
            vendor_id: vendor.id,
            business_name: vendor.business_name.clone(),
            address: vendor.address.clone(),
            city: vendor.city.clone(),
            state: vendor.state.clone(),
            tags: vendor.tags.clone(),
            image: vendor.images.first().cloned(),
            offers_home: vendor.offers_home,
            offers_drive: vendor.offers_drive,
            distance_miles: distance_miles.map(|d| (d * 10.0).round() / 10.0),
            position,
        }
    }
}

/// One pin on the map, sharing `vendor_id` with its card
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapMarkerDto {
    pub vendor_id: Uuid,
    pub business_name: String,
    pub lat: f64,
    pub lon: f64,
    /// `synthetic` pins are approximate placements, not real locations
    pub source: GeocodingSource,
}

/// Vendor list and map markers built from one filtered collection
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscoveryResultDto {
    pub cards: Vec<VendorCardDto>,
    pub markers: Vec<MapMarkerDto>,
    /// Where the map should be centered
    pub center: LatLon,
    /// Set when the focused vendor is on the map
    pub focus_vendor_id: Option<Uuid>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeocodeCacheClearedDto {
    pub removed: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeocodeCacheStatsDto {
    /// Coordinates currently cached
    pub entries: u64,
    /// Most coordinates the cache will hold
    pub capacity: u64,
}
