//! HTTP-level integration tests for the comment subsystem.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, patch_json_auth, post_json, post_json_auth};
use kritika_db::models::title::CreateTitle;
use kritika_db::repositories::TitleRepo;
use sqlx::PgPool;

/// Seed a title plus one review and return (title_id, review_id).
async fn seed_title_with_review(pool: &PgPool, name: &str, author_token: &str) -> (i64, i64) {
    let input = CreateTitle {
        name: name.to_string(),
        year: 1999,
        description: None,
        category: None,
        genres: None,
    };
    let title_id = TitleRepo::create(pool, &input, None, &[])
        .await
        .expect("title creation should succeed")
        .id;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        serde_json::json!({"text": "the review", "score": 7}),
        author_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let review_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    (title_id, review_id)
}

/// Anyone may list comments; creating one requires authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_create_requires_auth(pool: PgPool) {
    let author = common::create_test_user(&pool, "author", "user").await;
    let (title_id, review_id) =
        seed_title_with_review(&pool, "Discussed", &common::token_for(&author)).await;

    let path = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");

    let app = common::build_test_app(pool.clone());
    let response = get(app, &path).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = post_json(app, &path, serde_json::json!({"text": "anon"})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Unlike reviews, a user may post any number of comments on one review.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unlimited_comments_per_user(pool: PgPool) {
    let author = common::create_test_user(&pool, "author", "user").await;
    let token = common::token_for(&author);
    let (title_id, review_id) = seed_title_with_review(&pool, "Chatty", &token).await;

    let path = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");

    for text in ["first", "second", "third"] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, &path, serde_json::json!({"text": text}), &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get(app, &path).await;
    let json = body_json(response).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 3);
    // Oldest first.
    assert_eq!(comments[0]["text"], "first");
    assert_eq!(comments[2]["text"], "third");
}

/// Blank comment text is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_comment_rejected(pool: PgPool) {
    let author = common::create_test_user(&pool, "author", "user").await;
    let token = common::token_for(&author);
    let (title_id, review_id) = seed_title_with_review(&pool, "Quiet", &token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments"),
        serde_json::json!({"text": "   "}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Comment mutation follows the author-or-moderator rule.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_permissions(pool: PgPool) {
    let author = common::create_test_user(&pool, "author", "user").await;
    let stranger = common::create_test_user(&pool, "stranger", "user").await;
    let moderator = common::create_test_user(&pool, "mod", "moderator").await;
    let author_token = common::token_for(&author);
    let (title_id, review_id) = seed_title_with_review(&pool, "Contested", &author_token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments"),
        serde_json::json!({"text": "hot take"}),
        &author_token,
    )
    .await;
    let comment_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let comment_path =
        format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}");

    // Stranger cannot edit or delete.
    let stranger_token = common::token_for(&stranger);
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &comment_path,
        serde_json::json!({"text": "defaced"}),
        &stranger_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &comment_path, &stranger_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Author can edit.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &comment_path,
        serde_json::json!({"text": "cooler take"}),
        &author_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["text"], "cooler take");

    // Moderator can delete.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &comment_path, &common::token_for(&moderator)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &comment_path).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A comment fetched through a mismatched review path is not found.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_path_mismatch_404(pool: PgPool) {
    let author = common::create_test_user(&pool, "author", "user").await;
    let other = common::create_test_user(&pool, "other", "user").await;
    let author_token = common::token_for(&author);
    let (title_id, review_id) = seed_title_with_review(&pool, "Threaded", &author_token).await;

    // A second review on the same title by another user.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        serde_json::json!({"text": "another view", "score": 4}),
        &common::token_for(&other),
    )
    .await;
    let other_review = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments"),
        serde_json::json!({"text": "attached here"}),
        &author_token,
    )
    .await;
    let comment_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Same comment id through the other review's path.
    let app = common::build_test_app(pool);
    let response = get(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{other_review}/comments/{comment_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting a review takes its comments with it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_delete_cascades_comments(pool: PgPool) {
    let author = common::create_test_user(&pool, "author", "user").await;
    let token = common::token_for(&author);
    let (title_id, review_id) = seed_title_with_review(&pool, "Withdrawn", &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments"),
        serde_json::json!({"text": "soon orphaned"}),
        &token,
    )
    .await;
    let comment_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews/{review_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    use kritika_db::repositories::CommentRepo;
    assert!(CommentRepo::find_by_id(&pool, comment_id)
        .await
        .unwrap()
        .is_none());
}
