pub mod bugs;
pub mod categories;
pub mod health;
pub mod ideas;
pub mod session;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws/ideas                                        live idea snapshots
/// /ws/categories                                   live category snapshots
///
/// /session/login                                   check admin code (POST)
///
/// /ideas                                           list, create
/// /ideas/{id}                                      get, edit, delete
/// /ideas/{id}/stage                                move (PUT)
/// /ideas/{id}/blocked                              block/unblock (PUT)
/// /ideas/{id}/notes                                add note (POST)
/// /ideas/{id}/notes/{note_id}                      delete note
/// /ideas/{id}/categories/{category_id}             tag (PUT), untag (DELETE)
///
/// /categories                                      list, create
/// /categories/{id}                                 delete
/// /categories/{id}/stats                           tile totals
///
/// /bugs                                            list, submit
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket live queries.
        .route("/ws/ideas", get(ws::ideas_ws_handler))
        .route("/ws/categories", get(ws::categories_ws_handler))
        .nest("/session", session::router())
        .nest("/ideas", ideas::router())
        .nest("/categories", categories::router())
        .nest("/bugs", bugs::router())
}
