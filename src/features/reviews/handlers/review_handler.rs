use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{CreateReviewDto, ReviewResponseDto};
use crate::features::reviews::services::ReviewService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List reviews for a vendor, newest first
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Vendor ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Reviews retrieved", body = ApiResponse<Vec<ReviewResponseDto>>),
        (status = 404, description = "Vendor not found")
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(service): State<Arc<ReviewService>>,
    Path(vendor_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewResponseDto>>>> {
    let (reviews, total) = service.list(vendor_id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(reviews),
        None,
        Some(Meta { total }),
    )))
}

/// Post a review without phone verification
#[utoipa::path(
    post,
    path = "/api/vendors/{id}/reviews",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Vendor not found")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(service): State<Arc<ReviewService>>,
    Path(vendor_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate().map_err(AppError::from_validation)?;

    let review = service.create(vendor_id, dto, None).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(review), None, None)),
    ))
}

/// Post a review as a phone-verified user
#[utoipa::path(
    post,
    path = "/api/vendors/{id}/reviews/verified",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Verified review created", body = ApiResponse<ReviewResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Vendor not found")
    ),
    tag = "reviews",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_verified_review(
    user: AuthenticatedUser,
    State(service): State<Arc<ReviewService>>,
    Path(vendor_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate().map_err(AppError::from_validation)?;

    let review = service.create(vendor_id, dto, Some(&user)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(review), None, None)),
    ))
}
