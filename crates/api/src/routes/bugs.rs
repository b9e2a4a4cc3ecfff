//! Route definitions for bug reports.
//!
//! Mounted at `/bugs` by `api_routes()`.

use axum::routing::post;
use axum::Router;

use crate::handlers::bugs;
use crate::state::AppState;

/// Bug report routes.
///
/// ```text
/// POST   /    -> submit_bug_report
/// GET    /    -> list_bug_reports
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(bugs::submit_bug_report).get(bugs::list_bug_reports),
    )
}
