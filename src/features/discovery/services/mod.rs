pub mod discovery_service;
pub mod geocoding_service;

pub use discovery_service::DiscoveryService;
pub use geocoding_service::{GeocodingService, NominatimProvider};
