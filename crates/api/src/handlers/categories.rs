//! Handlers for the `/categories` resource.
//!
//! Create/list/delete only -- categories have no update surface. Reads
//! are public, mutation is admin-only. Deleting a category detaches its
//! titles rather than deleting them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kritika_core::error::CoreError;
use kritika_core::validation::validate_slug;
use kritika_db::models::category::CreateCategory;
use kritika_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /categories
///
/// List all categories. Public.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /categories
///
/// Create a category. Admin only.
pub async fn create_category(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name is required".to_string(),
        )));
    }
    validate_slug(&input.slug).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if CategoryRepo::find_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category '{}' already exists",
            input.slug
        ))));
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = auth.principal.id,
        category_id = category.id,
        slug = %category.slug,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// DELETE /categories/{slug}
///
/// Delete a category. Admin only.
pub async fn delete_category(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = CategoryRepo::delete_by_slug(&state.pool, &slug).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Unknown category '{slug}'")));
    }

    tracing::info!(user_id = auth.principal.id, slug = %slug, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
