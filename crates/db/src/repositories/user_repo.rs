//! Repository for the `users` table.

use kritika_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list for users queries.
const COLUMNS: &str = "id, username, email, bio, role, is_superuser, \
    confirmation_code_hash, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let role = input.role.as_deref().unwrap_or("user");
        let query = format!(
            "INSERT INTO users (username, email, bio, role)
             VALUES ($1, $2, COALESCE($3, ''), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.bio)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user whose username or email collides with the given pair.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Patch a user's email, bio and/or role. Returns `None` if the user
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                bio = COALESCE($3, bio),
                role = COALESCE($4, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.bio)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user by username. Their reviews and comments cascade, so
    /// every title they reviewed gets its rating recomputed in the same
    /// transaction. Returns `true` if a row was deleted.
    pub async fn delete_by_username(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((user_id,)) = user_id else {
            return Ok(false);
        };

        // Lock the affected titles in a stable order before the cascade,
        // mirroring the review store's per-title serialization.
        let title_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM titles
             WHERE id IN (SELECT title_id FROM reviews WHERE author_id = $1)
             ORDER BY id
             FOR UPDATE",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if !title_ids.is_empty() {
            sqlx::query(
                "UPDATE titles
                 SET rating = (SELECT AVG(score)::float8 FROM reviews
                               WHERE title_id = titles.id)
                 WHERE id = ANY($1)",
            )
            .bind(&title_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Store the hash of a freshly issued confirmation code.
    pub async fn set_confirmation_code(
        pool: &PgPool,
        id: DbId,
        code_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET confirmation_code_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(code_hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Atomically consume a confirmation code: clears the stored hash only
    /// if it matches, so each code is single-use even under concurrent
    /// exchange attempts. Returns `true` on a match.
    pub async fn consume_confirmation_code(
        pool: &PgPool,
        id: DbId,
        code_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET confirmation_code_hash = NULL
             WHERE id = $1 AND confirmation_code_hash = $2",
        )
        .bind(id)
        .bind(code_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
