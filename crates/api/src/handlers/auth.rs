//! Handlers for the `/auth` resource (signup, token exchange).
//!
//! The flow is passwordless: signup stores the hash of a short
//! confirmation code, and `/auth/token` exchanges a matching code for an
//! access token. Delivering the code to the user is an external concern;
//! it is written to the structured log for the delivery mechanism to pick
//! up.

use axum::extract::State;
use axum::Json;
use kritika_core::error::CoreError;
use kritika_core::validation::{validate_email, validate_username};
use kritika_db::models::user::CreateUser;
use kritika_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::confirmation::{generate_confirmation_code, hash_confirmation_code};
use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Response body for `POST /auth/signup`.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Successful token exchange response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register with username + email, or re-request a confirmation code for
/// an existing (username, email) pair. A partial collision with another
/// account is a conflict.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    validate_username(&input.username)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_email(&input.email).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let existing =
        UserRepo::find_by_username_or_email(&state.pool, &input.username, &input.email).await?;

    let user = match existing {
        Some(user) if user.username == input.username && user.email == input.email => user,
        Some(_) => {
            return Err(AppError::Core(CoreError::Conflict(
                "Username or email is already in use".into(),
            )));
        }
        None => {
            let user = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username: input.username.clone(),
                    email: input.email.clone(),
                    bio: None,
                    role: None,
                },
            )
            .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User signed up");
            user
        }
    };

    let (code, code_hash) = generate_confirmation_code();
    UserRepo::set_confirmation_code(&state.pool, user.id, &code_hash).await?;

    // Delivery is out of band; surface the code to the operator log.
    tracing::info!(
        user_id = user.id,
        username = %user.username,
        confirmation_code = %code,
        "Confirmation code issued"
    );

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchange a username + confirmation code for an access token. Codes are
/// single-use.
pub async fn token(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or confirmation code".into(),
            ))
        })?;

    let code_hash = hash_confirmation_code(&input.confirmation_code);
    let consumed =
        UserRepo::consume_confirmation_code(&state.pool, user.id, &code_hash).await?;
    if !consumed {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or confirmation code".into(),
        )));
    }

    let access_token =
        generate_access_token(user.id, &user.role, user.is_superuser, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "Access token issued");

    Ok(Json(TokenResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}
