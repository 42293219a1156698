//! Route definitions for the comments resource.
//!
//! Nested under `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Comment routes.
///
/// ```text
/// GET    /                -> list_comments (public)
/// POST   /                -> create_comment (authed)
/// GET    /{comment_id}    -> get_comment (public)
/// PATCH  /{comment_id}    -> update_comment (owner/mod/admin)
/// DELETE /{comment_id}    -> delete_comment (owner/mod/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{comment_id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
}
