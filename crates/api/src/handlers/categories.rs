//! Handlers for categories.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use ideaboard_core::board;
use ideaboard_core::category::{self, NewCategory};
use ideaboard_store::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::response::{CreatedId, DataResponse};
use crate::state::AppState;

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /categories. `color` defaults to `#6366F1`.
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<impl IntoResponse> {
    category::validate_new_category(&input)?;
    let id = CategoryRepo::create(state.store.as_ref(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: CreatedId { id } })))
}

/// DELETE /categories/{id}. Ideas tagged with it keep the dangling id.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    CategoryRepo::delete(state.store.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /categories/{id}/stats: total, blocked and per-stage counts of the
/// ideas tagged with the category. Unknown ids simply count zero.
pub async fn category_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let snapshot = state.ideas.snapshot()?;
    Ok(Json(DataResponse {
        data: board::category_stats(&snapshot, &id),
    }))
}
