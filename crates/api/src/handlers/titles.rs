//! Handlers for the `/titles` resource.
//!
//! Reads are public and embed the aggregate rating; mutation is
//! admin-only. Nothing here writes `rating` -- that column belongs to the
//! review store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kritika_core::error::CoreError;
use kritika_core::types::DbId;
use kritika_db::models::title::{CreateTitle, UpdateTitle};
use kritika_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Resolve an optional category slug to its id, rejecting unknown slugs.
async fn resolve_category(
    pool: &kritika_db::DbPool,
    slug: Option<&str>,
) -> AppResult<Option<DbId>> {
    let Some(slug) = slug else {
        return Ok(None);
    };
    let category = CategoryRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown category '{slug}'")))
        })?;
    Ok(Some(category.id))
}

/// Resolve genre slugs to ids, rejecting any unknown slug.
async fn resolve_genres(
    pool: &kritika_db::DbPool,
    slugs: Option<&[String]>,
) -> AppResult<Option<Vec<DbId>>> {
    let Some(slugs) = slugs else {
        return Ok(None);
    };
    let genres = GenreRepo::find_by_slugs(pool, slugs).await?;
    let known: Vec<&str> = genres.iter().map(|g| g.slug.as_str()).collect();
    let unknown: Vec<&str> = slugs
        .iter()
        .map(String::as_str)
        .filter(|s| !known.contains(s))
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown genres: {}",
            unknown.join(", ")
        ))));
    }
    Ok(Some(genres.into_iter().map(|g| g.id).collect()))
}

/// GET /titles
///
/// List all titles with category, genres, and rating. Public.
pub async fn list_titles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let titles = TitleRepo::list_detail(&state.pool).await?;
    Ok(Json(DataResponse { data: titles }))
}

/// POST /titles
///
/// Create a title. Admin only.
pub async fn create_title(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTitle>,
) -> AppResult<impl IntoResponse> {
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title name is required".to_string(),
        )));
    }

    let category_id = resolve_category(&state.pool, input.category.as_deref()).await?;
    let genre_ids = resolve_genres(&state.pool, input.genres.as_deref()).await?;

    let title = TitleRepo::create(
        &state.pool,
        &input,
        category_id,
        genre_ids.as_deref().unwrap_or(&[]),
    )
    .await?;

    tracing::info!(
        user_id = auth.principal.id,
        title_id = title.id,
        name = %title.name,
        "Title created"
    );

    let detail = TitleRepo::find_detail(&state.pool, title.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title.id,
        }))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /titles/{id}
///
/// Get a single title with category, genres, and rating. Public.
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = TitleRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /titles/{id}
///
/// Update a title; a present `genres` list replaces the membership. Admin
/// only.
pub async fn update_title(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTitle>,
) -> AppResult<impl IntoResponse> {
    let category_id = resolve_category(&state.pool, input.category.as_deref()).await?;
    let genre_ids = resolve_genres(&state.pool, input.genres.as_deref()).await?;

    let title = TitleRepo::update(&state.pool, id, &input, category_id, genre_ids.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))?;

    tracing::info!(
        user_id = auth.principal.id,
        title_id = id,
        "Title updated"
    );

    let detail = TitleRepo::find_detail(&state.pool, title.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /titles/{id}
///
/// Delete a title, cascading to its reviews and their comments. Admin
/// only.
pub async fn delete_title(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = TitleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }));
    }

    tracing::info!(user_id = auth.principal.id, title_id = id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}
