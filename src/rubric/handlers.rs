// src/rubric/handlers.rs
// Rubric routes are nested under the persona that owns them; every
// operation first proves ownership of that persona.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use super::types::RubricData;
use crate::api::error::ApiResult;
use crate::auth::AuthUser;
use crate::state::AppState;

/// GET /api/personas/{id}/rubric
pub async fn get_rubric_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(persona_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.persona_store.get_owned(&persona_id, &user.id).await?;
    let rubric = state.rubric_store.get_for_persona(&persona_id).await?;
    Ok(Json(rubric))
}

/// PUT /api/personas/{id}/rubric
pub async fn upsert_rubric_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(persona_id): Path<String>,
    Json(payload): Json<RubricData>,
) -> ApiResult<impl IntoResponse> {
    state.persona_store.get_owned(&persona_id, &user.id).await?;
    let rubric = state.rubric_store.upsert(&persona_id, payload).await?;
    Ok(Json(rubric))
}

/// DELETE /api/personas/{id}/rubric
pub async fn delete_rubric_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(persona_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.persona_store.get_owned(&persona_id, &user.id).await?;
    state.rubric_store.delete_for_persona(&persona_id).await?;
    Ok(Json(json!({ "success": true })))
}
