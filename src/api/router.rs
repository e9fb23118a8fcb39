// src/api/router.rs

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::json;

use crate::chat::handlers::{chat_handler, public_chat_handler};
use crate::persona::handlers::{
    create_persona_handler, create_starter_persona_handler, delete_persona_handler,
    extract_profile_handler, get_persona_by_slug_handler, get_persona_handler,
    list_personas_handler, update_persona_handler,
};
use crate::rubric::handlers::{delete_rubric_handler, get_rubric_handler, upsert_rubric_handler};
use crate::session::handlers::{
    create_session_handler, get_session_handler, list_sessions_handler, replace_messages_handler,
};
use crate::state::AppState;
use crate::submission::handlers::{
    list_instructors_handler, list_submissions_handler, submit_session_handler,
    update_feedback_handler,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/personas",
            post(create_persona_handler).get(list_personas_handler),
        )
        .route("/api/personas/starter", post(create_starter_persona_handler))
        .route(
            "/api/personas/{id}",
            get(get_persona_handler)
                .patch(update_persona_handler)
                .delete(delete_persona_handler),
        )
        .route("/api/personas/{id}/extract", post(extract_profile_handler))
        .route(
            "/api/personas/{id}/rubric",
            get(get_rubric_handler)
                .put(upsert_rubric_handler)
                .delete(delete_rubric_handler),
        )
        .route("/api/public/personas/{slug}", get(get_persona_by_slug_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/public/chat", post(public_chat_handler))
        .route(
            "/api/sessions",
            post(create_session_handler).get(list_sessions_handler),
        )
        .route("/api/sessions/{id}", get(get_session_handler))
        .route("/api/sessions/{id}/messages", put(replace_messages_handler))
        .route("/api/sessions/{id}/submit", post(submit_session_handler))
        .route("/api/submissions", get(list_submissions_handler))
        .route(
            "/api/submissions/{id}/feedback",
            post(update_feedback_handler),
        )
        .route("/api/instructors", get(list_instructors_handler))
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
