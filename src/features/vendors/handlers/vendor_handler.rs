use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::vendors::dtos::{
    CreateVendorDto, FeaturedQuery, RemoveImageDto, SetServiceDto, UpdateVendorDto,
    UploadImageDto, VendorDetailDto, VendorResponseDto,
};
use crate::features::vendors::services::VendorService;
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, DEFAULT_FEATURED_LIMIT, MAX_IMAGE_SIZE};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List vendors, newest first
#[utoipa::path(
    get,
    path = "/api/vendors",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Vendors retrieved", body = ApiResponse<Vec<VendorResponseDto>>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(service): State<Arc<VendorService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<VendorResponseDto>>>> {
    let (vendors, total) = service.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(vendors),
        None,
        Some(Meta { total }),
    )))
}

/// Random selection of vendors for the home page
#[utoipa::path(
    get,
    path = "/api/vendors/featured",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Featured vendors", body = ApiResponse<Vec<VendorResponseDto>>)
    ),
    tag = "vendors"
)]
pub async fn list_featured_vendors(
    State(service): State<Arc<VendorService>>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<Vec<VendorResponseDto>>>> {
    let vendors = service
        .featured(query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT))
        .await?;
    Ok(Json(ApiResponse::success(Some(vendors), None, None)))
}

/// Get a vendor with its review summary
#[utoipa::path(
    get,
    path = "/api/vendors/{id}",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor retrieved", body = ApiResponse<VendorDetailDto>),
        (status = 404, description = "Vendor not found")
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(service): State<Arc<VendorService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VendorDetailDto>>> {
    let vendor = service.get_detail(id).await?;
    Ok(Json(ApiResponse::success(Some(vendor), None, None)))
}

/// Register a vendor owned by the current user
#[utoipa::path(
    post,
    path = "/api/vendors",
    request_body = CreateVendorDto,
    responses(
        (status = 201, description = "Vendor registered", body = ApiResponse<VendorResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "vendors",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_vendor(
    user: AuthenticatedUser,
    State(service): State<Arc<VendorService>>,
    AppJson(dto): AppJson<CreateVendorDto>,
) -> Result<(StatusCode, Json<ApiResponse<VendorResponseDto>>)> {
    dto.validate().map_err(AppError::from_validation)?;

    let vendor = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(vendor),
            Some("Vendor registered".to_string()),
            None,
        )),
    ))
}

/// Save the vendor dashboard
#[utoipa::path(
    put,
    path = "/api/vendors/{id}",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body = UpdateVendorDto,
    responses(
        (status = 200, description = "Vendor updated", body = ApiResponse<VendorResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the vendor's owner"),
        (status = 404, description = "Vendor not found")
    ),
    tag = "vendors",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_vendor(
    user: AuthenticatedUser,
    State(service): State<Arc<VendorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateVendorDto>,
) -> Result<Json<ApiResponse<VendorResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let vendor = service.update(id, &user, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(vendor),
        Some("Vendor updated".to_string()),
        None,
    )))
}

/// Switch one catalog service on or off
#[utoipa::path(
    put,
    path = "/api/vendors/{id}/services/{category}/{service_id}",
    params(
        ("id" = Uuid, Path, description = "Vendor ID"),
        ("category" = String, Path, description = "Catalog category id, e.g. hair"),
        ("service_id" = String, Path, description = "Catalog service id, e.g. color")
    ),
    request_body = SetServiceDto,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<VendorResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the vendor's owner"),
        (status = 404, description = "Vendor or service not found")
    ),
    tag = "vendors",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_vendor_service(
    user: AuthenticatedUser,
    State(service): State<Arc<VendorService>>,
    Path((id, category, service_id)): Path<(Uuid, String, String)>,
    AppJson(dto): AppJson<SetServiceDto>,
) -> Result<Json<ApiResponse<VendorResponseDto>>> {
    let vendor = service
        .set_service(id, &user, &category, &service_id, dto.enabled)
        .await?;
    Ok(Json(ApiResponse::success(Some(vendor), None, None)))
}

/// Upload a vendor image
///
/// Accepts multipart/form-data with a single `file` field.
#[utoipa::path(
    post,
    path = "/api/vendors/{id}/images",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body(content = UploadImageDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = ApiResponse<VendorResponseDto>),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the vendor's owner"),
        (status = 413, description = "File too large")
    ),
    tag = "vendors",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_vendor_image(
    user: AuthenticatedUser,
    State(service): State<Arc<VendorService>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<VendorResponseDto>>)> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some((file_name, content_type, data.to_vec()));
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    check_image(&content_type, data.len())?;

    let vendor = service
        .add_image(id, &user, &file_name, data, &content_type)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(vendor),
            Some("Image uploaded".to_string()),
            None,
        )),
    ))
}

/// Remove a vendor image by URL
#[utoipa::path(
    delete,
    path = "/api/vendors/{id}/images",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body = RemoveImageDto,
    responses(
        (status = 200, description = "Image removed", body = ApiResponse<VendorResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the vendor's owner"),
        (status = 404, description = "Vendor or image not found")
    ),
    tag = "vendors",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_vendor_image(
    user: AuthenticatedUser,
    State(service): State<Arc<VendorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RemoveImageDto>,
) -> Result<Json<ApiResponse<VendorResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let vendor = service.remove_image(id, &user, &dto.url).await?;
    Ok(Json(ApiResponse::success(
        Some(vendor),
        Some("Image removed".to_string()),
        None,
    )))
}

fn check_image(content_type: &str, size: usize) -> Result<()> {
    if size == 0 {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }
    if size > MAX_IMAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {}MB",
            MAX_IMAGE_SIZE / 1024 / 1024
        )));
    }
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type '{}'. Allowed: {}",
            content_type,
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_image() {
        assert!(check_image("image/png", 1024).is_ok());
        assert!(check_image("image/webp", MAX_IMAGE_SIZE).is_ok());
        assert!(matches!(
            check_image("image/png", MAX_IMAGE_SIZE + 1),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            check_image("application/pdf", 1024),
            Err(AppError::BadRequest(_))
        ));
        assert!(check_image("image/jpeg", 0).is_err());
    }
}
