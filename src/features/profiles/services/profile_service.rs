use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::profiles::dtos::{NewProfile, ProfileResponseDto, UpdateProfileDto};
use crate::features::profiles::models::Profile;

const PROFILE_COLUMNS: &str =
    "uid, phone_number, email, username, is_verified, created_at, updated_at";

/// Map a unique-key violation to a conflict, anything else to a database error
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some(c) if c.contains("username") => "Username is already taken",
                _ => "Profile already exists",
            };
            return AppError::Conflict(message.to_string());
        }
    }
    tracing::error!("Failed to {}: {:?}", context, e);
    AppError::Database(e)
}

/// Profile operations the sign-up flow depends on
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn username_available(&self, username: &str) -> Result<bool>;

    async fn create(&self, new_profile: NewProfile) -> Result<ProfileResponseDto>;
}

/// Service for profile operations
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, uid: &str) -> Result<ProfileResponseDto> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE uid = $1",
            PROFILE_COLUMNS
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get profile: {:?}", e);
            AppError::Database(e)
        })?;

        profile
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Create the profile for a freshly verified phone account, in one transaction
    pub async fn create(&self, new_profile: NewProfile) -> Result<ProfileResponseDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE LOWER(username) = LOWER($1))",
        )
        .bind(&new_profile.username)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "check username"))?;

        if taken {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (uid, phone_number, email, username, is_verified)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(&new_profile.uid)
        .bind(&new_profile.phone_number)
        .bind(&new_profile.email)
        .bind(&new_profile.username)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "create profile"))?;

        tx.commit().await.map_err(|e| map_write_error(e, "commit profile"))?;

        tracing::info!(uid = %profile.uid, "Profile created");
        Ok(profile.into())
    }

    pub async fn update(&self, uid: &str, dto: UpdateProfileDto) -> Result<ProfileResponseDto> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET email = COALESCE($2, email),
                username = COALESCE($3, username),
                updated_at = NOW()
            WHERE uid = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(uid)
        .bind(dto.email.as_deref().map(str::trim))
        .bind(dto.username.as_deref().map(str::trim))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update profile"))?;

        profile
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Whether nobody holds `username` (case-insensitive). Lookup errors are returned, not
    /// reported as available.
    pub async fn username_available(&self, username: &str) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE LOWER(username) = LOWER($1))",
        )
        .bind(username.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check username availability: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(!taken)
    }
}

#[async_trait]
impl ProfileStore for ProfileService {
    async fn username_available(&self, username: &str) -> Result<bool> {
        ProfileService::username_available(self, username).await
    }

    async fn create(&self, new_profile: NewProfile) -> Result<ProfileResponseDto> {
        ProfileService::create(self, new_profile).await
    }
}
