use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reviews::models::Review;

/// Request DTO for posting a review
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewDto {
    #[validate(length(min = 3, max = 80, message = "Name must be at least 3 characters"))]
    pub author_name: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 10, max = 2000, message = "Comment must be at least 10 characters"))]
    pub comment: String,
}

impl CreateReviewDto {
    /// Trim free-text fields so length rules apply to visible characters
    pub fn normalized(self) -> Self {
        Self {
            author_name: self.author_name.trim().to_string(),
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: String,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponseDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            vendor_id: r.vendor_id,
            author_name: r.author_name,
            rating: r.rating,
            comment: r.comment,
            phone_verified: r.phone_verified,
            created_at: r.created_at,
        }
    }
}

/// Review count and average rating for a vendor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ReviewSummaryDto {
    pub review_count: i64,
    /// Rounded to 2 decimals, absent when there are no reviews
    pub average_rating: Option<f64>,
}

impl ReviewSummaryDto {
    pub fn from_aggregate(review_count: i64, average: Option<Decimal>) -> Self {
        Self {
            review_count,
            average_rating: average.and_then(|avg| avg.round_dp(2).to_f64()),
        }
    }
}
