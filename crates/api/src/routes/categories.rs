//! Route definitions for categories.
//!
//! Mounted at `/categories` by `api_routes()`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes.
///
/// ```text
/// GET    /              -> list_categories
/// POST   /              -> create_category
/// DELETE /{id}          -> delete_category
/// GET    /{id}/stats    -> category_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/{id}", delete(categories::delete_category))
        .route("/{id}/stats", get(categories::category_stats))
}
