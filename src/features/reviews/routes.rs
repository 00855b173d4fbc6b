use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;

pub fn public_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route(
            "/api/vendors/{id}/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .with_state(service)
}

pub fn protected_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route(
            "/api/vendors/{id}/reviews/verified",
            post(handlers::create_verified_review),
        )
        .with_state(service)
}
