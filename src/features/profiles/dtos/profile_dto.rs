use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::profiles::models::Profile;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponseDto {
    pub uid: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponseDto {
    fn from(p: Profile) -> Self {
        Self {
            uid: p.uid,
            phone_number: p.phone_number,
            email: p.email,
            username: p.username,
            is_verified: p.is_verified,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Request DTO for updating the current profile; absent fields are left unchanged
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        regex(
            path = "*crate::shared::validation::USERNAME_REGEX",
            message = "Username may only contain letters, numbers and underscores"
        )
    )]
    pub username: Option<String>,
}

/// Values written when a profile is first created at sign-up
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub uid: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct UsernameAvailabilityQuery {
    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        regex(
            path = "*crate::shared::validation::USERNAME_REGEX",
            message = "Username may only contain letters, numbers and underscores"
        )
    )]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsernameAvailabilityDto {
    pub username: String,
    pub available: bool,
}
