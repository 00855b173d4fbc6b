use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::vendors::handlers;
use crate::features::vendors::services::VendorService;
use crate::shared::constants::MAX_IMAGE_SIZE;

pub fn public_routes(service: Arc<VendorService>) -> Router {
    Router::new()
        .route("/api/vendors", get(handlers::list_vendors))
        .route("/api/vendors/featured", get(handlers::list_featured_vendors))
        .route("/api/vendors/{id}", get(handlers::get_vendor))
        .route("/api/catalog/services", get(handlers::list_service_catalog))
        .with_state(service)
}

pub fn protected_routes(service: Arc<VendorService>) -> Router {
    Router::new()
        .route("/api/vendors", post(handlers::create_vendor))
        .route("/api/vendors/{id}", put(handlers::update_vendor))
        .route(
            "/api/vendors/{id}/services/{category}/{service_id}",
            put(handlers::set_vendor_service),
        )
        .route(
            "/api/vendors/{id}/images",
            post(handlers::upload_vendor_image).delete(handlers::remove_vendor_image),
        )
        // Multipart framing on top of the largest accepted image
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
        .with_state(service)
}
