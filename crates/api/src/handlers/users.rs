//! Handlers for the `/users` resource.
//!
//! The username-keyed surface is admin-only; `/users/me` is available to
//! any authenticated principal but cannot change its own role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kritika_core::error::CoreError;
use kritika_core::roles::Role;
use kritika_core::validation::{validate_email, validate_username};
use kritika_db::models::user::{CreateUser, UpdateUser, User};
use kritika_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_user_by_username(
    pool: &kritika_db::DbPool,
    username: &str,
) -> AppResult<User> {
    UserRepo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown user '{username}'")))
}

fn validate_role_name(role: &str) -> AppResult<()> {
    if Role::parse(role).is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role '{role}'"
        ))));
    }
    Ok(())
}

/// GET /users
///
/// List all users. Admin only.
pub async fn list_users(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /users
///
/// Create a user with an explicit role. Admin only.
pub async fn create_user(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    validate_username(&input.username)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_email(&input.email).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if let Some(ref role) = input.role {
        validate_role_name(role)?;
    }

    if UserRepo::find_by_username_or_email(&state.pool, &input.username, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Username or email is already in use".into(),
        )));
    }

    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(
        admin_id = auth.principal.id,
        user_id = user.id,
        username = %user.username,
        role = %user.role,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /users/{username}
///
/// Get a user by username. Admin only.
pub async fn get_user(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = ensure_user_by_username(&state.pool, &username).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /users/{username}
///
/// Patch a user's email, bio and/or role. Admin only.
pub async fn update_user(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref email) = input.email {
        validate_email(email).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    if let Some(ref role) = input.role {
        validate_role_name(role)?;
    }

    let user = ensure_user_by_username(&state.pool, &username).await?;
    let user = UserRepo::update(&state.pool, user.id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown user '{username}'")))?;

    tracing::info!(
        admin_id = auth.principal.id,
        user_id = user.id,
        username = %user.username,
        "User updated"
    );

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /users/{username}
///
/// Delete a user. Their reviews and comments go with them. Admin only.
pub async fn delete_user(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = UserRepo::delete_by_username(&state.pool, &username).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Unknown user '{username}'")));
    }

    tracing::info!(admin_id = auth.principal.id, username = %username, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/me
///
/// Get the authenticated user's own record.
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.principal.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.principal.id,
        }))?;
    Ok(Json(DataResponse { data: user }))
}

/// PATCH /users/me
///
/// Update the authenticated user's own email and/or bio. The role field
/// is immutable through this endpoint.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if input.role.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "Role cannot be changed".to_string(),
        )));
    }
    if let Some(ref email) = input.email {
        validate_email(email).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let user = UserRepo::update(&state.pool, auth.principal.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.principal.id,
        }))?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(DataResponse { data: user }))
}
