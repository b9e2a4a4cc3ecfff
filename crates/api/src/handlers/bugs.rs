//! Handlers for bug reports.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use ideaboard_core::bug_report::{self, NewBugReport};
use ideaboard_store::repositories::BugReportRepo;

use crate::error::AppResult;
use crate::response::{CreatedId, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /bugs
// ---------------------------------------------------------------------------

/// Submit a bug report. When the body carries no `userAgent`, the request's
/// `User-Agent` header is recorded instead.
pub async fn submit_bug_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut input): Json<NewBugReport>,
) -> AppResult<impl IntoResponse> {
    bug_report::validate_description(&input.description)?;

    if input.user_agent.is_none() {
        input.user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    let id = BugReportRepo::create(state.store.as_ref(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: CreatedId { id } })))
}

// ---------------------------------------------------------------------------
// GET /bugs
// ---------------------------------------------------------------------------

/// All bug reports, newest first.
pub async fn list_bug_reports(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let reports = BugReportRepo::list(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: reports }))
}
