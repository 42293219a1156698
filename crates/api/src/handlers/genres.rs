//! Handlers for the `/genres` resource.
//!
//! Same create/list/delete shape as categories. Deleting a genre removes
//! its title memberships but never the titles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kritika_core::error::CoreError;
use kritika_core::validation::validate_slug;
use kritika_db::models::genre::CreateGenre;
use kritika_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /genres
///
/// List all genres. Public.
pub async fn list_genres(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let genres = GenreRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// POST /genres
///
/// Create a genre. Admin only.
pub async fn create_genre(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGenre>,
) -> AppResult<impl IntoResponse> {
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Genre name is required".to_string(),
        )));
    }
    validate_slug(&input.slug).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if GenreRepo::find_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Genre '{}' already exists",
            input.slug
        ))));
    }

    let genre = GenreRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = auth.principal.id,
        genre_id = genre.id,
        slug = %genre.slug,
        "Genre created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// DELETE /genres/{slug}
///
/// Delete a genre. Admin only.
pub async fn delete_genre(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = GenreRepo::delete_by_slug(&state.pool, &slug).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Unknown genre '{slug}'")));
    }

    tracing::info!(user_id = auth.principal.id, slug = %slug, "Genre deleted");

    Ok(StatusCode::NO_CONTENT)
}
