//! Review model.

use kritika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: DbId,
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a review.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub text: String,
    pub score: i16,
}

/// DTO for updating a review.
#[derive(Debug, Deserialize)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i16>,
}
