use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::{
    ProfileResponseDto, UpdateProfileDto, UsernameAvailabilityDto, UsernameAvailabilityQuery,
};
use crate::features::profiles::services::ProfileService;
use crate::shared::types::ApiResponse;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse<ProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    let profile = service.get(&user.uid).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

/// Update the current user's email or username
#[utoipa::path(
    patch,
    path = "/api/profiles/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username already taken")
    ),
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<ProfileService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<ProfileResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let profile = service.update(&user.uid, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Profile updated".to_string()),
        None,
    )))
}

/// Check whether a username is free
#[utoipa::path(
    get,
    path = "/api/profiles/username-availability",
    params(UsernameAvailabilityQuery),
    responses(
        (status = 200, description = "Availability checked", body = ApiResponse<UsernameAvailabilityDto>),
        (status = 400, description = "Invalid username")
    ),
    tag = "profiles"
)]
pub async fn check_username_availability(
    State(service): State<Arc<ProfileService>>,
    Query(query): Query<UsernameAvailabilityQuery>,
) -> Result<Json<ApiResponse<UsernameAvailabilityDto>>> {
    query.validate().map_err(AppError::from_validation)?;

    let available = service.username_available(&query.username).await?;
    Ok(Json(ApiResponse::success(
        Some(UsernameAvailabilityDto {
            username: query.username,
            available,
        }),
        None,
        None,
    )))
}
