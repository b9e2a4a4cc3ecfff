//! Mounted at `/session` by `api_routes()`.

use axum::routing::post;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// ```text
/// POST   /login    -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(session::login))
}
