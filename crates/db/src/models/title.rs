//! Title model.
//!
//! `rating` is maintained exclusively by the review store's aggregation
//! step; catalog writes never touch it.

use kritika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::category::Category;
use crate::models::genre::Genre;

/// A row from the `titles` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    /// Mean review score, `None` while the title has no reviews.
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full title representation with its category and genres resolved.
#[derive(Debug, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TitleDetail {
    pub fn from_parts(title: Title, category: Option<Category>, genres: Vec<Genre>) -> Self {
        TitleDetail {
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            rating: title.rating,
            category,
            genres,
            created_at: title.created_at,
            updated_at: title.updated_at,
        }
    }
}

/// DTO for creating a title. Category and genres are referenced by slug.
#[derive(Debug, Deserialize)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// DTO for updating a title. A present `genres` list replaces the
/// membership wholesale.
#[derive(Debug, Deserialize)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}
