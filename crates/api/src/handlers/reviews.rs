//! Handlers for the `/titles/{title_id}/reviews` resource.
//!
//! Reads are public; creation requires an authenticated principal;
//! updates and deletes require the author, a moderator, or an admin.
//! Every mutation recomputes the owning title's rating inside the same
//! database transaction (see `kritika_db::ReviewRepo`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kritika_core::error::CoreError;
use kritika_core::policy;
use kritika_core::types::DbId;
use kritika_core::validation::{validate_score, validate_text};
use kritika_db::models::review::{CreateReview, Review, UpdateReview};
use kritika_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a review and verify it belongs to the title named in the path.
/// A mismatched parent is indistinguishable from a missing review.
pub(crate) async fn ensure_review_in_title(
    pool: &kritika_db::DbPool,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    let review = ReviewRepo::find_by_id(pool, review_id)
        .await?
        .filter(|r| r.title_id == title_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;
    Ok(review)
}

async fn ensure_title_exists(pool: &kritika_db::DbPool, title_id: DbId) -> AppResult<()> {
    TitleRepo::find_by_id(pool, title_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        }))?;
    Ok(())
}

/// GET /titles/{title_id}/reviews
///
/// List a title's reviews, oldest first. Public.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_title_exists(&state.pool, title_id).await?;

    let reviews = ReviewRepo::list_by_title(&state.pool, title_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /titles/{title_id}/reviews
///
/// Create a review. One review per user per title; the title's rating is
/// recomputed before the response is sent.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    validate_score(input.score).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_text(&input.text).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    ensure_title_exists(&state.pool, title_id).await?;

    // Friendly-path duplicate check; concurrent duplicates are resolved by
    // uq_reviews_title_author and classified to the same 409.
    let existing =
        ReviewRepo::find_by_title_and_author(&state.pool, title_id, auth.principal.id).await?;
    if existing.is_some() {
        return Err(AppError::Core(CoreError::DuplicateReview { title_id }));
    }

    let review = ReviewRepo::create(&state.pool, title_id, auth.principal.id, &input).await?;

    tracing::info!(
        user_id = auth.principal.id,
        review_id = review.id,
        title_id,
        score = review.score,
        "Review created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /titles/{title_id}/reviews/{id}
///
/// Get a single review. Public.
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let review = ensure_review_in_title(&state.pool, title_id, id).await?;
    Ok(Json(DataResponse { data: review }))
}

/// PATCH /titles/{title_id}/reviews/{id}
///
/// Update a review's text and/or score. Author, moderator, or admin only.
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    if let Some(score) = input.score {
        validate_score(score).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(ref text) = input.text {
        validate_text(text).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let review = ensure_review_in_title(&state.pool, title_id, id).await?;

    if !policy::can_modify_resource(&auth.principal, review.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author, a moderator, or an admin may edit a review".into(),
        )));
    }

    let review = ReviewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    tracing::info!(
        user_id = auth.principal.id,
        review_id = id,
        title_id,
        "Review updated"
    );

    Ok(Json(DataResponse { data: review }))
}

/// DELETE /titles/{title_id}/reviews/{id}
///
/// Delete a review and its comments. Author, moderator, or admin only.
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let review = ensure_review_in_title(&state.pool, title_id, id).await?;

    if !policy::can_modify_resource(&auth.principal, review.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author, a moderator, or an admin may delete a review".into(),
        )));
    }

    let deleted = ReviewRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }));
    }

    tracing::info!(
        user_id = auth.principal.id,
        review_id = id,
        title_id,
        "Review deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
