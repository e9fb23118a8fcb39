// src/persona/handlers.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::info;

use super::types::{CreatePatientActor, UpdatePatientActor};
use crate::api::error::ApiResult;
use crate::auth::AuthUser;
use crate::state::AppState;

pub async fn create_persona_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreatePatientActor>,
) -> ApiResult<impl IntoResponse> {
    let actor = app_state.persona_store.create(&user.id, payload).await?;
    info!("Created patient actor {} ({})", actor.slug, actor.id);
    Ok((StatusCode::CREATED, Json(actor)))
}

pub async fn create_starter_persona_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let actor = app_state.persona_store.create_starter(&user.id).await?;
    info!("Created starter patient actor for user {}", user.id);
    Ok((StatusCode::CREATED, Json(actor)))
}

pub async fn list_personas_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let actors = app_state.persona_store.list_mine(&user.id).await?;
    Ok(Json(actors))
}

pub async fn get_persona_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let actor = app_state.persona_store.get_owned(&id, &user.id).await?;
    Ok(Json(actor))
}

pub async fn update_persona_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePatientActor>,
) -> ApiResult<impl IntoResponse> {
    let actor = app_state
        .persona_store
        .update(&id, &user.id, payload)
        .await?;
    Ok(Json(actor))
}

pub async fn delete_persona_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    app_state.persona_store.delete(&id, &user.id).await?;
    info!("Deleted patient actor {}", id);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Best-effort extraction of structured fields from a persona's legacy
/// free-text prompt, for prefilling the structured editor.
pub async fn extract_profile_handler(
    State(app_state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let actor = app_state.persona_store.get_owned(&id, &user.id).await?;
    Ok(Json(crate::prompt::extract(&actor.prompt)))
}

/// Public slug lookup, no authentication. Private and absent personas are
/// indistinguishable from the outside.
pub async fn get_persona_by_slug_handler(
    State(app_state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let actor = app_state.persona_store.get_by_slug_public(&slug).await?;
    Ok(Json(actor))
}
