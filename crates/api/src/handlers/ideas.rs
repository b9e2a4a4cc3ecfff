//! Handlers for the idea board.
//!
//! Reads come from the idea repository's cached live snapshot; writes go
//! straight to the store and show up in the snapshot once delivered. Input
//! is validated here because the repository stores whatever it is given.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use ideaboard_core::board;
use ideaboard_core::error::CoreError;
use ideaboard_core::idea::{self, IdeaUpdate, NewIdea};
use ideaboard_core::stage::Stage;

use crate::error::AppResult;
use crate::response::{CreatedId, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /ideas`.
#[derive(Debug, Default, Deserialize)]
pub struct IdeaListParams {
    pub stage: Option<String>,
    pub category: Option<String>,
}

/// Request body for `PUT /ideas/{id}/stage`.
#[derive(Debug, Deserialize)]
pub struct MoveStage {
    pub stage: String,
}

/// Request body for `PUT /ideas/{id}/blocked`.
#[derive(Debug, Deserialize)]
pub struct SetBlocked {
    pub blocked: bool,
    #[serde(default)]
    pub reason: String,
}

/// Request body for `POST /ideas/{id}/notes`.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub text: String,
    pub author: String,
}

// ---------------------------------------------------------------------------
// GET /ideas
// ---------------------------------------------------------------------------

/// List ideas.
///
/// With `stage`, returns that pipeline column (blocked first, then newest
/// first). With `category`, only ideas tagged with it, newest first. Both
/// filters combine.
pub async fn list_ideas(
    State(state): State<AppState>,
    Query(params): Query<IdeaListParams>,
) -> AppResult<impl IntoResponse> {
    let stage = params.stage.as_deref().map(Stage::from_str).transpose()?;
    let snapshot = state.ideas.snapshot()?;

    let ideas = match (stage, params.category.as_deref()) {
        (Some(stage), category) => {
            let mut column = board::pipeline_column(&snapshot, stage);
            if let Some(category) = category {
                column.retain(|i| i.categories.iter().any(|c| c == category));
            }
            column
        }
        (None, Some(category)) => board::category_column(&snapshot, category),
        (None, None) => {
            let mut all = snapshot;
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            all
        }
    };

    Ok(Json(DataResponse { data: ideas }))
}

// ---------------------------------------------------------------------------
// POST /ideas
// ---------------------------------------------------------------------------

/// Submit a new idea. It starts at the first stage, unblocked, with no notes.
pub async fn create_idea(
    State(state): State<AppState>,
    Json(input): Json<NewIdea>,
) -> AppResult<impl IntoResponse> {
    idea::validate_new_idea(&input)?;
    let id = state.ideas.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: CreatedId { id } })))
}

// ---------------------------------------------------------------------------
// GET /ideas/{id}
// ---------------------------------------------------------------------------

pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = state.ideas.find(&id)?.ok_or(CoreError::NotFound {
        entity: "Idea",
        id,
    })?;
    Ok(Json(DataResponse { data: found }))
}

// ---------------------------------------------------------------------------
// PATCH /ideas/{id}
// ---------------------------------------------------------------------------

/// Edit title, description or submitter.
pub async fn update_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<IdeaUpdate>,
) -> AppResult<impl IntoResponse> {
    idea::validate_update(&input)?;
    state.ideas.update_details(&id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// DELETE /ideas/{id}
// ---------------------------------------------------------------------------

/// Hard delete. Deleting an idea that is already gone also returns 204.
pub async fn delete_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.ideas.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /ideas/{id}/stage
// ---------------------------------------------------------------------------

/// Move to any stage; there is no transition order.
pub async fn move_stage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MoveStage>,
) -> AppResult<impl IntoResponse> {
    let stage = Stage::from_str(&input.stage)?;
    state.ideas.move_stage(&id, stage).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /ideas/{id}/blocked
// ---------------------------------------------------------------------------

pub async fn set_blocked(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetBlocked>,
) -> AppResult<impl IntoResponse> {
    state
        .ideas
        .set_blocked(&id, input.blocked, &input.reason)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /ideas/{id}/notes
// ---------------------------------------------------------------------------

pub async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateNote>,
) -> AppResult<impl IntoResponse> {
    idea::validate_note(&input.text, &input.author)?;
    let note = state.ideas.add_note(&id, &input.text, &input.author).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

// ---------------------------------------------------------------------------
// DELETE /ideas/{id}/notes/{note_id}
// ---------------------------------------------------------------------------

pub async fn delete_note(
    State(state): State<AppState>,
    Path((id, note_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.ideas.delete_note(&id, &note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT|DELETE /ideas/{id}/categories/{category_id}
// ---------------------------------------------------------------------------

/// Tag an idea. The category id is not checked against existing categories.
pub async fn add_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.ideas.add_category(&id, &category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_category(
    State(state): State<AppState>,
    Path((id, category_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.ideas.remove_category(&id, &category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
