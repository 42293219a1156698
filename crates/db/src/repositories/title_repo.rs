//! Repository for the `titles` table.
//!
//! Catalog writes here never touch `rating`; that column belongs to the
//! review store's aggregation step.

use std::collections::HashMap;

use kritika_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::models::category::Category;
use crate::models::genre::Genre;
use crate::models::title::{CreateTitle, Title, TitleDetail, UpdateTitle};

/// Column list for titles queries.
const COLUMNS: &str = "id, name, year, description, category_id, rating, created_at, updated_at";

/// Join row used to group genres per title.
#[derive(FromRow)]
struct TitleGenreRow {
    title_id: DbId,
    id: DbId,
    name: String,
    slug: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TitleGenreRow {
    fn into_genre(self) -> (DbId, Genre) {
        (
            self.title_id,
            Genre {
                id: self.id,
                name: self.name,
                slug: self.slug,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        )
    }
}

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Create a title with its genre memberships, returning the created
    /// row. The caller resolves category and genre slugs to ids first.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTitle,
        category_id: Option<DbId>,
        genre_ids: &[DbId],
    ) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(&input.name)
            .bind(input.year)
            .bind(&input.description)
            .bind(category_id)
            .fetch_one(&mut *tx)
            .await?;

        if !genre_ids.is_empty() {
            Self::set_genres_inner(&mut tx, title.id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(title)
    }

    /// Find a title by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles WHERE id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a title with its category and genres resolved.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        let Some(title) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut details = Self::resolve_details(pool, vec![title]).await?;
        Ok(details.pop())
    }

    /// List all titles with categories and genres resolved, ordered by id.
    pub async fn list_detail(pool: &PgPool) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles ORDER BY id");
        let titles = sqlx::query_as::<_, Title>(&query).fetch_all(pool).await?;
        Self::resolve_details(pool, titles).await
    }

    /// Update a title, optionally replacing its genre memberships.
    /// Returns `None` if the title does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
        category_id: Option<DbId>,
        genre_ids: Option<&[DbId]>,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.year)
            .bind(&input.description)
            .bind(category_id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref title) = title {
            if let Some(genre_ids) = genre_ids {
                sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                    .bind(title.id)
                    .execute(&mut *tx)
                    .await?;
                if !genre_ids.is_empty() {
                    Self::set_genres_inner(&mut tx, title.id, genre_ids).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(title)
    }

    /// Delete a title by ID. Its reviews, their comments, and its genre
    /// memberships go with it. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert genre membership rows for a title.
    async fn set_genres_inner(
        tx: &mut Transaction<'_, Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id)
             SELECT $1, genre_id FROM UNNEST($2::bigint[]) AS g(genre_id)
             ON CONFLICT ON CONSTRAINT uq_title_genres_title_genre DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Attach categories and genres to a batch of title rows.
    async fn resolve_details(
        pool: &PgPool,
        titles: Vec<Title>,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let title_ids: Vec<DbId> = titles.iter().map(|t| t.id).collect();
        let category_ids: Vec<DbId> = titles.iter().filter_map(|t| t.category_id).collect();

        let categories: Vec<Category> = if category_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Category>(
                "SELECT id, name, slug, created_at, updated_at
                 FROM categories WHERE id = ANY($1)",
            )
            .bind(&category_ids)
            .fetch_all(pool)
            .await?
        };
        let categories_by_id: HashMap<DbId, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        let genre_rows: Vec<TitleGenreRow> = if title_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, TitleGenreRow>(
                "SELECT tg.title_id, g.id, g.name, g.slug, g.created_at, g.updated_at
                 FROM title_genres tg
                 JOIN genres g ON g.id = tg.genre_id
                 WHERE tg.title_id = ANY($1)
                 ORDER BY tg.title_id, g.id",
            )
            .bind(&title_ids)
            .fetch_all(pool)
            .await?
        };
        let mut genres_by_title: HashMap<DbId, Vec<Genre>> = HashMap::new();
        for row in genre_rows {
            let (title_id, genre) = row.into_genre();
            genres_by_title.entry(title_id).or_default().push(genre);
        }

        Ok(titles
            .into_iter()
            .map(|title| {
                let category = title
                    .category_id
                    .and_then(|id| categories_by_id.get(&id).cloned());
                let genres = genres_by_title.remove(&title.id).unwrap_or_default();
                TitleDetail::from_parts(title, category, genres)
            })
            .collect())
    }
}
