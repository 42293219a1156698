//! Route definitions for the categories resource.
//!
//! Mounted at `/categories` by `api_routes()`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes.
///
/// ```text
/// GET    /         -> list_categories (public)
/// POST   /         -> create_category (admin)
/// DELETE /{slug}   -> delete_category (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/{slug}", delete(categories::delete_category))
}
