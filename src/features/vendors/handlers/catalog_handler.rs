use axum::Json;

use crate::features::vendors::catalog::{ServiceCategory, SERVICE_CATALOG};
use crate::shared::types::ApiResponse;

/// List the service categories and the services under each
#[utoipa::path(
    get,
    path = "/api/catalog/services",
    responses(
        (status = 200, description = "Service catalog", body = ApiResponse<Vec<ServiceCategory>>)
    ),
    tag = "vendors"
)]
pub async fn list_service_catalog() -> Json<ApiResponse<Vec<ServiceCategory>>> {
    Json(ApiResponse::success(Some(SERVICE_CATALOG.to_vec()), None, None))
}
