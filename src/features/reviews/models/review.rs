use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for reviews table
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: String,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
}
