//! User model.

use kritika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub role: String,
    pub is_superuser: bool,
    /// Never serialized into responses.
    #[serde(skip_serializing)]
    pub confirmation_code_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user (signup and admin creation).
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub role: Option<String>,
}

/// DTO for patching a user. `role` is honored only on the admin surface;
/// the `/users/me` handler rejects it before it reaches the repository.
#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}
