//! Comment model.

use kritika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: DbId,
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub text: String,
}

/// DTO for updating a comment.
#[derive(Debug, Deserialize)]
pub struct UpdateComment {
    pub text: Option<String>,
}
