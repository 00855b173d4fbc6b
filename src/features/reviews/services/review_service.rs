use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{CreateReviewDto, ReviewResponseDto, ReviewSummaryDto};
use crate::features::reviews::models::Review;
use crate::shared::types::PaginationQuery;

const REVIEW_COLUMNS: &str =
    "id, vendor_id, author_name, rating, comment, phone_verified, created_at";

/// Service for review operations
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a review. `reviewer` is present only on the phone-verified route.
    pub async fn create(
        &self,
        vendor_id: Uuid,
        dto: CreateReviewDto,
        reviewer: Option<&AuthenticatedUser>,
    ) -> Result<ReviewResponseDto> {
        self.ensure_vendor_exists(vendor_id).await?;

        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (id, vendor_id, author_name, rating, comment, phone_verified, reviewer_uid)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(vendor_id)
        .bind(&dto.author_name)
        .bind(dto.rating)
        .bind(&dto.comment)
        .bind(reviewer.is_some())
        .bind(reviewer.map(|u| u.uid.clone()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create review: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            vendor_id = %vendor_id,
            verified = review.phone_verified,
            "Review created"
        );

        Ok(review.into())
    }

    /// Reviews for a vendor, newest first
    pub async fn list(
        &self,
        vendor_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ReviewResponseDto>, i64)> {
        self.ensure_vendor_exists(vendor_id).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE vendor_id = $1")
            .bind(vendor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reviews: {:?}", e);
                AppError::Database(e)
            })?;

        let reviews = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {}
            FROM reviews
            WHERE vendor_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            REVIEW_COLUMNS
        ))
        .bind(vendor_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reviews: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reviews.into_iter().map(Into::into).collect(), total))
    }

    pub async fn summary(&self, vendor_id: Uuid) -> Result<ReviewSummaryDto> {
        let (count, average): (i64, Option<Decimal>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(rating)::NUMERIC FROM reviews WHERE vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to summarize reviews: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(ReviewSummaryDto::from_aggregate(count, average))
    }

    async fn ensure_vendor_exists(&self, vendor_id: Uuid) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vendors WHERE id = $1)")
            .bind(vendor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check vendor: {:?}", e);
                AppError::Database(e)
            })?;

        if !exists {
            return Err(AppError::NotFound(format!("Vendor '{}' not found", vendor_id)));
        }
        Ok(())
    }
}
