//! Repository for the `reviews` table: the review store and the rating
//! aggregator.
//!
//! Every mutation runs as one transaction that locks the owning title row,
//! applies the change, and recomputes the title's rating before
//! committing. The lock serializes conflicting review operations per
//! title, so an acknowledged write never leaves `titles.rating` computed
//! from a partially-applied review set, and a failed write rolls the whole
//! unit back.

use kritika_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Column list for reviews queries.
const COLUMNS: &str = "id, title_id, author_id, text, score, created_at, updated_at";

/// Provides CRUD and rating aggregation for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Create a review for a title, recomputing the title's rating in the
    /// same transaction.
    ///
    /// Fails with `RowNotFound` if the title does not exist, and with a
    /// unique violation on `uq_reviews_title_author` if the author already
    /// holds a review on this title.
    pub async fn create(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::lock_title(&mut tx, title_id).await?;

        let query = format!(
            "INSERT INTO reviews (title_id, author_id, text, score)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(author_id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_one(&mut *tx)
            .await?;

        Self::recompute_title_rating(&mut tx, title_id).await?;

        tx.commit().await?;
        Ok(review)
    }

    /// Find a review by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the review a given author holds on a title, if any.
    pub async fn find_by_title_and_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE title_id = $1 AND author_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(author_id)
            .fetch_optional(pool)
            .await
    }

    /// List a title's reviews, oldest first.
    pub async fn list_by_title(
        pool: &PgPool,
        title_id: DbId,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE title_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .fetch_all(pool)
            .await
    }

    /// Update a review's text and/or score, recomputing the title's
    /// rating in the same transaction. Returns `None` if the review does
    /// not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title_id: Option<(DbId,)> =
            sqlx::query_as("SELECT title_id FROM reviews WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((title_id,)) = title_id else {
            return Ok(None);
        };

        Self::lock_title(&mut tx, title_id).await?;

        let query = format!(
            "UPDATE reviews SET
                text = COALESCE($2, text),
                score = COALESCE($3, score)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_one(&mut *tx)
            .await?;

        Self::recompute_title_rating(&mut tx, title_id).await?;

        tx.commit().await?;
        Ok(Some(review))
    }

    /// Delete a review, recomputing the title's rating over the reduced
    /// set. Returns `false` if no review existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title_id: Option<(DbId,)> =
            sqlx::query_as("SELECT title_id FROM reviews WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((title_id,)) = title_id else {
            return Ok(false);
        };

        Self::lock_title(&mut tx, title_id).await?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::recompute_title_rating(&mut tx, title_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Take the per-title write lock. Acquired before any review mutation
    /// so the subsequent recompute observes a fully-applied review set.
    async fn lock_title(conn: &mut PgConnection, title_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT id FROM titles WHERE id = $1 FOR UPDATE")
            .bind(title_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(())
    }

    /// Recompute a title's rating as the mean of its current review
    /// scores. `AVG` over an empty set is NULL, which is the stored
    /// sentinel for "no reviews". Idempotent.
    async fn recompute_title_rating(
        conn: &mut PgConnection,
        title_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE titles
             SET rating = (SELECT AVG(score)::float8 FROM reviews WHERE title_id = $1)
             WHERE id = $1",
        )
        .bind(title_id)
        .execute(&mut *conn)
        .await?;

        tracing::debug!(title_id, "Recomputed title rating");
        Ok(())
    }
}
