//! Route definitions for the titles resource.
//!
//! Mounted at `/titles` by `api_routes()`; nests the review routes under
//! `/{title_id}/reviews`.

use axum::routing::get;
use axum::Router;

use crate::handlers::titles;
use crate::state::AppState;

/// Title routes.
///
/// ```text
/// GET    /                        -> list_titles (public)
/// POST   /                        -> create_title (admin)
/// GET    /{title_id}              -> get_title (public)
/// PATCH  /{title_id}              -> update_title (admin)
/// DELETE /{title_id}              -> delete_title (admin)
/// .../{title_id}/reviews          -> review routes (nested)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(titles::list_titles).post(titles::create_title))
        .route(
            "/{title_id}",
            get(titles::get_title)
                .patch(titles::update_title)
                .delete(titles::delete_title),
        )
        .nest("/{title_id}/reviews", super::reviews::router())
}
