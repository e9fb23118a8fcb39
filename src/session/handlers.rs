// src/session/handlers.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::types::Message;
use crate::api::error::ApiResult;
use crate::auth::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub patient_actor_id: String,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub id: String,
    /// Canonical opening line; clients seed the transcript with it.
    pub greeting: &'static str,
}

pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = app_state
        .session_store
        .create(&user.id, &payload.patient_actor_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id,
            greeting: crate::chat::GREETING_MESSAGE,
        }),
    ))
}

#[derive(Deserialize)]
pub struct ReplaceMessagesRequest {
    pub messages: Vec<Message>,
}

/// Immediate (non-debounced) persistence of the full message list. Any
/// save still pending in the debouncer is superseded, so flush it first.
pub async fn replace_messages_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ReplaceMessagesRequest>,
) -> ApiResult<impl IntoResponse> {
    app_state.save_debouncer.flush(&id).await;
    app_state
        .session_store
        .replace_messages(&id, &user.id, &payload.messages)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn list_sessions_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let sessions = app_state.session_store.list_for_student(&user.id).await?;
    Ok(Json(sessions))
}

pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let detail = app_state.session_store.get_detail(&id, &user.id).await?;
    Ok(Json(detail))
}
