use std::sync::Arc;

use crate::core::error::Result;
use crate::features::discovery::dtos::{DiscoveryResultDto, DiscoverySearchQuery};
use crate::features::discovery::filter::VendorFilter;
use crate::features::discovery::pipeline::{discover, DiscoveryRequest};
use crate::features::discovery::services::GeocodingService;
use crate::features::vendors::VendorService;

/// Vendor search for the list and map views
pub struct DiscoveryService {
    vendors: Arc<VendorService>,
    geocoder: Arc<GeocodingService>,
}

impl DiscoveryService {
    pub fn new(vendors: Arc<VendorService>, geocoder: Arc<GeocodingService>) -> Self {
        Self { vendors, geocoder }
    }

    pub async fn search(&self, query: DiscoverySearchQuery) -> Result<DiscoveryResultDto> {
        let request = DiscoveryRequest {
            filter: VendorFilter::from_query(
                query.categories.as_deref(),
                query.sub_tags.as_deref(),
                query.location.as_deref(),
            ),
            user_location: query.user_location(),
            radius_miles: query
                .radius_miles
                .unwrap_or(self.geocoder.config().default_radius_miles),
            focus_vendor_id: query.focus_vendor_id,
        };

        let vendors = self.vendors.list_all().await?;
        Ok(discover(&self.geocoder, vendors, &request).await)
    }
}
