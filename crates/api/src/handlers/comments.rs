//! Handlers for the `/titles/{title_id}/reviews/{review_id}/comments`
//! resource.
//!
//! Comments mirror reviews' permission rules but carry no uniqueness
//! constraint and never touch the title's rating.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kritika_core::error::CoreError;
use kritika_core::policy;
use kritika_core::types::DbId;
use kritika_core::validation::validate_text;
use kritika_db::models::comment::{Comment, CreateComment, UpdateComment};
use kritika_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::reviews::ensure_review_in_title;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a comment and verify its parent chain matches the path.
async fn ensure_comment_in_review(
    pool: &kritika_db::DbPool,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    ensure_review_in_title(pool, title_id, review_id).await?;

    let comment = CommentRepo::find_by_id(pool, comment_id)
        .await?
        .filter(|c| c.review_id == review_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;
    Ok(comment)
}

/// GET /titles/{title_id}/reviews/{review_id}/comments
///
/// List a review's comments, oldest first. Public.
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_review_in_title(&state.pool, title_id, review_id).await?;

    let comments = CommentRepo::list_by_review(&state.pool, review_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /titles/{title_id}/reviews/{review_id}/comments
///
/// Create a comment. Any authenticated principal may comment, any number
/// of times.
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_text(&input.text).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    ensure_review_in_title(&state.pool, title_id, review_id).await?;

    let comment =
        CommentRepo::create(&state.pool, review_id, auth.principal.id, &input).await?;

    tracing::info!(
        user_id = auth.principal.id,
        comment_id = comment.id,
        review_id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /titles/{title_id}/reviews/{review_id}/comments/{id}
///
/// Get a single comment. Public.
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let comment = ensure_comment_in_review(&state.pool, title_id, review_id, id).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// PATCH /titles/{title_id}/reviews/{review_id}/comments/{id}
///
/// Update a comment's text. Author, moderator, or admin only.
pub async fn update_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref text) = input.text {
        validate_text(text).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let comment = ensure_comment_in_review(&state.pool, title_id, review_id, id).await?;

    if !policy::can_modify_resource(&auth.principal, comment.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author, a moderator, or an admin may edit a comment".into(),
        )));
    }

    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    tracing::info!(
        user_id = auth.principal.id,
        comment_id = id,
        review_id,
        "Comment updated"
    );

    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /titles/{title_id}/reviews/{review_id}/comments/{id}
///
/// Delete a comment. Author, moderator, or admin only.
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let comment = ensure_comment_in_review(&state.pool, title_id, review_id, id).await?;

    if !policy::can_modify_resource(&auth.principal, comment.author_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author, a moderator, or an admin may delete a comment".into(),
        )));
    }

    let deleted = CommentRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }));
    }

    tracing::info!(
        user_id = auth.principal.id,
        comment_id = id,
        review_id,
        "Comment deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
