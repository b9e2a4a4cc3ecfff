//! Route definitions for ideas.
//!
//! Mounted at `/ideas` by `api_routes()`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::ideas;
use crate::state::AppState;

/// Idea routes.
///
/// ```text
/// GET    /                                 -> list_ideas (?stage=, ?category=)
/// POST   /                                 -> create_idea
/// GET    /{id}                             -> get_idea
/// PATCH  /{id}                             -> update_idea
/// DELETE /{id}                             -> delete_idea
/// PUT    /{id}/stage                       -> move_stage
/// PUT    /{id}/blocked                     -> set_blocked
/// POST   /{id}/notes                       -> add_note
/// DELETE /{id}/notes/{note_id}             -> delete_note
/// PUT    /{id}/categories/{category_id}    -> add_category
/// DELETE /{id}/categories/{category_id}    -> remove_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ideas::list_ideas).post(ideas::create_idea))
        .route(
            "/{id}",
            get(ideas::get_idea)
                .patch(ideas::update_idea)
                .delete(ideas::delete_idea),
        )
        .route("/{id}/stage", put(ideas::move_stage))
        .route("/{id}/blocked", put(ideas::set_blocked))
        .route("/{id}/notes", post(ideas::add_note))
        .route("/{id}/notes/{note_id}", delete(ideas::delete_note))
        .route(
            "/{id}/categories/{category_id}",
            put(ideas::add_category).delete(ideas::remove_category),
        )
}
