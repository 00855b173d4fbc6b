use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::profiles::dtos::ProfileResponseDto;

/// Request DTO for sending a one-time code by SMS
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendCodeRequestDto {
    /// E.164 phone number, e.g. "+13105550100"
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_E164_REGEX",
        message = "Phone number must be in E.164 format"
    ))]
    pub phone_number: String,

    /// Token from the client-side reCAPTCHA challenge
    #[validate(length(min = 1, message = "reCAPTCHA token is required"))]
    pub recaptcha_token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SendCodeResponseDto {
    /// Opaque value to send back with the code
    pub session_info: String,
}

/// Request DTO for confirming a one-time code
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyCodeRequestDto {
    #[validate(length(min = 1, message = "Session info is required"))]
    pub session_info: String,

    #[validate(regex(
        path = "*crate::shared::validation::OTP_CODE_REGEX",
        message = "Code must be 6 digits"
    ))]
    pub code: String,
}

/// Request DTO for creating an account: confirms the code and writes the profile
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequestDto {
    #[validate(length(min = 1, message = "Session info is required"))]
    pub session_info: String,

    #[validate(regex(
        path = "*crate::shared::validation::OTP_CODE_REGEX",
        message = "Code must be 6 digits"
    ))]
    pub code: String,

    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        regex(
            path = "*crate::shared::validation::USERNAME_REGEX",
            message = "Username may only contain letters, numbers and underscores"
        )
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequestDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Identity summary returned with tokens
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthUserDto {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_new_user: bool,
}

/// Response DTO for a confirmed code
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponseDto {
    /// Provider ID token, sent as the bearer token
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: AuthUserDto,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignUpResponseDto {
    pub session: AuthResponseDto,
    pub profile: ProfileResponseDto,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshTokenResponseDto {
    pub uid: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Current user as seen by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponseDto {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub roles: Vec<String>,
    pub is_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            is_admin: user.is_admin(),
            uid: user.uid,
            phone_number: user.phone_number,
            roles: user.roles,
        }
    }
}
