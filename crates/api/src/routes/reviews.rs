//! Route definitions for the reviews resource.
//!
//! Nested under `/titles/{title_id}/reviews`; nests the comment routes
//! under `/{review_id}/comments`.

use axum::routing::get;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Review routes.
///
/// ```text
/// GET    /                        -> list_reviews (public)
/// POST   /                        -> create_review (authed)
/// GET    /{review_id}             -> get_review (public)
/// PATCH  /{review_id}             -> update_review (owner/mod/admin)
/// DELETE /{review_id}             -> delete_review (owner/mod/admin)
/// .../{review_id}/comments        -> comment routes (nested)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/{review_id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .nest("/{review_id}/comments", super::comments::router())
}
