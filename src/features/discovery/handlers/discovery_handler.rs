use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::RequireAdmin;
use crate::features::discovery::dtos::{
    DiscoveryResultDto, DiscoverySearchQuery, GeocodeCacheClearedDto, GeocodeCacheStatsDto,
    GeocodeQuery,
};
use crate::features::discovery::models::GeocodedPoint;
use crate::features::discovery::services::{DiscoveryService, GeocodingService};
use crate::shared::types::ApiResponse;

/// Search vendors for the list and map views
#[utoipa::path(
    get,
    path = "/api/discovery/search",
    params(DiscoverySearchQuery),
    responses(
        (status = 200, description = "Vendor cards and map markers", body = ApiResponse<DiscoveryResultDto>),
        (status = 400, description = "Invalid query")
    ),
    tag = "discovery"
)]
pub async fn search_vendors(
    State(service): State<Arc<DiscoveryService>>,
    AppQuery(query): AppQuery<DiscoverySearchQuery>,
) -> Result<Json<ApiResponse<DiscoveryResultDto>>> {
    query.validate().map_err(AppError::from_validation)?;

    let result = service.search(query).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Resolve an address to a coordinate
#[utoipa::path(
    get,
    path = "/api/discovery/geocode",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Coordinate resolved", body = ApiResponse<GeocodedPoint>),
        (status = 400, description = "Missing address"),
        (status = 404, description = "No coordinate found")
    ),
    tag = "discovery"
)]
pub async fn geocode_address(
    State(geocoder): State<Arc<GeocodingService>>,
    AppQuery(query): AppQuery<GeocodeQuery>,
) -> Result<Json<ApiResponse<GeocodedPoint>>> {
    query.validate().map_err(AppError::from_validation)?;

    let point = geocoder
        .resolve(&query.address)
        .await
        .ok_or_else(|| AppError::NotFound("No coordinate found for address".to_string()))?;
    Ok(Json(ApiResponse::success(Some(point), None, None)))
}

/// Drop every cached coordinate
#[utoipa::path(
    delete,
    path = "/api/discovery/geocode-cache",
    responses(
        (status = 200, description = "Cache cleared", body = ApiResponse<GeocodeCacheClearedDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "discovery",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_geocode_cache(
    RequireAdmin(admin): RequireAdmin,
    State(geocoder): State<Arc<GeocodingService>>,
) -> Result<Json<ApiResponse<GeocodeCacheClearedDto>>> {
    let removed = geocoder.clear().await;
    tracing::info!(admin = %admin.uid, removed, "Geocode cache cleared by admin");

    Ok(Json(ApiResponse::success(
        Some(GeocodeCacheClearedDto { removed }),
        Some("Geocode cache cleared".to_string()),
        None,
    )))
}

/// Size of the geocode cache
#[utoipa::path(
    get,
    path = "/api/discovery/geocode-cache",
    responses(
        (status = 200, description = "Cache size", body = ApiResponse<GeocodeCacheStatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "discovery",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_geocode_cache_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(geocoder): State<Arc<GeocodingService>>,
) -> Result<Json<ApiResponse<GeocodeCacheStatsDto>>> {
    let stats = GeocodeCacheStatsDto {
        entries: geocoder.cached_len().await,
        capacity: geocoder.cache_capacity(),
    };
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}
