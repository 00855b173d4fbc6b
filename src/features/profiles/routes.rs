use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::profiles::handlers;
use crate::features::profiles::services::ProfileService;

pub fn public_routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(
            "/api/profiles/username-availability",
            get(handlers::check_username_availability),
        )
        .with_state(service)
}

pub fn protected_routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(
            "/api/profiles/me",
            get(handlers::get_my_profile).patch(handlers::update_my_profile),
        )
        .with_state(service)
}
