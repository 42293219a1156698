//! Genre model.

use kritika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `genres` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a genre.
#[derive(Debug, Deserialize)]
pub struct CreateGenre {
    pub name: String,
    pub slug: String,
}
