use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, MeResponseDto, RefreshTokenRequestDto, RefreshTokenResponseDto,
    SendCodeRequestDto, SendCodeResponseDto, SignUpRequestDto, SignUpResponseDto,
    VerifyCodeRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Send a one-time code by SMS
#[utoipa::path(
    post,
    path = "/api/auth/phone/send-code",
    request_body = SendCodeRequestDto,
    responses(
        (status = 200, description = "Code sent", body = ApiResponse<SendCodeResponseDto>),
        (status = 400, description = "Invalid phone number or reCAPTCHA token"),
        (status = 502, description = "Auth provider unavailable")
    ),
    tag = "auth"
)]
pub async fn send_code(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<SendCodeRequestDto>,
) -> Result<Json<ApiResponse<SendCodeResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let response = service.send_code(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(response),
        Some("Verification code sent".to_string()),
        None,
    )))
}

/// Confirm a one-time code and sign in
#[utoipa::path(
    post,
    path = "/api/auth/phone/verify",
    request_body = VerifyCodeRequestDto,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired code")
    ),
    tag = "auth"
)]
pub async fn verify_code(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<VerifyCodeRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let response = service.verify_code(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Confirm a one-time code and create the account's profile
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    request_body = SignUpRequestDto,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<SignUpResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired code"),
        (status = 409, description = "Username already taken or profile exists")
    ),
    tag = "auth"
)]
pub async fn sign_up(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<SignUpRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<SignUpResponseDto>>)> {
    dto.validate().map_err(AppError::from_validation)?;

    let response = service.sign_up(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Account created".to_string()),
            None,
        )),
    ))
}

/// Exchange a refresh token for a new ID token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<RefreshTokenResponseDto>),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<RefreshTokenResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let response = service.refresh(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(service.me(user)), None, None)))
}
