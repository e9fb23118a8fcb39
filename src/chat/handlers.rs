// src/chat/handlers.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::gateway::FALLBACK_MESSAGE;
use crate::api::error::ApiResult;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::session::types::Message;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub patient_actor_id: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub fallback: bool,
}

/// POST /api/chat
///
/// Generates the next patient turn. When a session id is supplied the
/// updated transcript (history plus the new reply) is persisted through
/// the debouncer, so a burst of turns costs one write.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> ApiResult<impl IntoResponse> {
    let result = state
        .gateway
        .respond_owned(&payload.patient_actor_id, &user.id, &payload.messages)
        .await;

    let (message, fallback) = match result {
        Ok(reply) => (reply, false),
        // Model failure stays in character; everything else is a real error.
        Err(AppError::Upstream(_)) => (FALLBACK_MESSAGE.to_string(), true),
        Err(e) => return Err(e.into()),
    };

    if let Some(session_id) = payload.session_id {
        let mut transcript = payload.messages;
        transcript.push(Message::assistant(&message));

        let store = Arc::clone(&state.session_store);
        let user_id = user.id.clone();
        let key = session_id.clone();
        state.save_debouncer.schedule(&key, move || async move {
            if let Err(e) = store
                .replace_messages(&session_id, &user_id, &transcript)
                .await
            {
                warn!(session = %session_id, error = %e, "debounced session save failed");
            }
        });
    }

    Ok(Json(ChatResponse { message, fallback }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicChatRequest {
    pub patient_actor_id: String,
    pub messages: Vec<Message>,
}

/// POST /api/public/chat
///
/// Guest chat against a public persona. Stateless: nothing is persisted.
pub async fn public_chat_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PublicChatRequest>,
) -> ApiResult<impl IntoResponse> {
    let result = state
        .gateway
        .respond_public(&payload.patient_actor_id, &payload.messages)
        .await;

    let (message, fallback) = match result {
        Ok(reply) => (reply, false),
        Err(AppError::Upstream(_)) => (FALLBACK_MESSAGE.to_string(), true),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ChatResponse { message, fallback }))
}
