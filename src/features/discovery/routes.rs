use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::discovery::handlers;
use crate::features::discovery::services::{DiscoveryService, GeocodingService};

pub fn public_routes(service: Arc<DiscoveryService>, geocoder: Arc<GeocodingService>) -> Router {
    Router::new()
        .route("/api/discovery/search", get(handlers::search_vendors))
        .with_state(service)
        .merge(geocode_routes(geocoder))
}

fn geocode_routes(geocoder: Arc<GeocodingService>) -> Router {
    Router::new()
        .route("/api/discovery/geocode", get(handlers::geocode_address))
        .with_state(geocoder)
}

pub fn protected_routes(geocoder: Arc<GeocodingService>) -> Router {
    Router::new()
        .route(
            "/api/discovery/geocode-cache",
            get(handlers::get_geocode_cache_stats).delete(handlers::clear_geocode_cache),
        )
        .with_state(geocoder)
}
