//! HTTP-level integration tests for the signup / token-exchange flow.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json};
use kritika_api::auth::confirmation::hash_confirmation_code;
use kritika_db::repositories::UserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// Signup creates a user with the default role and stores a code hash.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_creates_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({"username": "newbie", "email": "newbie@test.com"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "newbie");
    assert_eq!(json["email"], "newbie@test.com");

    let user = UserRepo::find_by_username(&pool, "newbie")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(user.role, "user");
    assert!(user.confirmation_code_hash.is_some());
}

/// The username `me` is reserved.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_rejects_reserved_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({"username": "me", "email": "me@test.com"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// Malformed email addresses are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_rejects_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({"username": "fine", "email": "not-an-email"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Re-signing up with the exact same pair re-issues a code instead of
/// failing, and does not create a second user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_reissues_code_for_same_pair(pool: PgPool) {
    let body = serde_json::json!({"username": "repeat", "email": "repeat@test.com"});

    let app = common::build_test_app(pool.clone());
    let first = post_json(app, "/api/v1/auth/signup", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let second = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(second.status(), StatusCode::OK);

    let users = UserRepo::list(&pool).await.unwrap();
    assert_eq!(users.len(), 1);
}

/// A username or email already used by a different account is a conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_signup_partial_collision_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({"username": "taken", "email": "taken@test.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Same username, different email.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({"username": "taken", "email": "other@test.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Same email, different username.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/signup",
        serde_json::json!({"username": "other", "email": "taken@test.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

/// A valid confirmation code yields a working access token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_token_exchange_succeeds(pool: PgPool) {
    let user = common::create_test_user(&pool, "holder", "user").await;
    UserRepo::set_confirmation_code(&pool, user.id, &hash_confirmation_code("123456"))
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/token",
        serde_json::json!({"username": "holder", "confirmation_code": "123456"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["access_token"].as_str().expect("token should be set");
    assert!(json["expires_in"].is_number());

    // The issued token authenticates /users/me.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "holder");
}

/// A wrong code is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_token_exchange_wrong_code(pool: PgPool) {
    let user = common::create_test_user(&pool, "wrongcode", "user").await;
    UserRepo::set_confirmation_code(&pool, user.id, &hash_confirmation_code("123456"))
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/token",
        serde_json::json!({"username": "wrongcode", "confirmation_code": "654321"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Confirmation codes are single-use.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_token_exchange_is_single_use(pool: PgPool) {
    let user = common::create_test_user(&pool, "oneshot", "user").await;
    UserRepo::set_confirmation_code(&pool, user.id, &hash_confirmation_code("123456"))
        .await
        .unwrap();

    let body = serde_json::json!({"username": "oneshot", "confirmation_code": "123456"});

    let app = common::build_test_app(pool.clone());
    let first = post_json(app, "/api/v1/auth/token", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let second = post_json(app, "/api/v1/auth/token", body).await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
}

/// An unknown username is rejected without leaking whether it exists.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_token_exchange_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/token",
        serde_json::json!({"username": "ghost", "confirmation_code": "123456"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// /users/me
// ---------------------------------------------------------------------------

/// Requests without a token are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The role field is immutable through /users/me.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_cannot_change_role(pool: PgPool) {
    let user = common::create_test_user(&pool, "climber", "user").await;
    let token = common::token_for(&user);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        serde_json::json!({"role": "admin"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let user = UserRepo::find_by_username(&pool, "climber")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, "user");
}

/// Bio and email are editable through /users/me.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_updates_profile(pool: PgPool) {
    let user = common::create_test_user(&pool, "editor", "user").await;
    let token = common::token_for(&user);

    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        serde_json::json!({"bio": "I review things."}),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["bio"], "I review things.");
}
