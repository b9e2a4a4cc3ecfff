//! Admin code check.
//!
//! The server only answers whether a code is the admin code. Remembering
//! admin mode is the client's job, and mutations are not gated on it.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub admin: bool,
}

/// POST /session/login
///
/// An unconfigured admin code never matches; startup already warns about it.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let admin = state.admin_secret.verify(&input.code);
    tracing::info!(admin, "Admin login attempt");
    Ok(Json(DataResponse {
        data: LoginResponse { admin },
    }))
}
