// src/submission/handlers.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSessionRequest {
    pub instructor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFilter {
    pub patient_actor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
    pub grade: Option<String>,
}

/// POST /api/sessions/{id}/submit
pub async fn submit_session_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<String>,
    Json(payload): Json<SubmitSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    // Make sure a debounced save isn't still in flight before the
    // transcript is frozen for review.
    state.save_debouncer.flush(&session_id).await;

    let submission = state
        .submission_store
        .submit(&session_id, &user.id, &payload.instructor_id)
        .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/submissions?patientActorId=...
pub async fn list_submissions_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(filter): Query<SubmissionFilter>,
) -> ApiResult<impl IntoResponse> {
    if !user.role.can_review() {
        return Err(ApiError::forbidden(
            "Only instructors can view submitted sessions",
        ));
    }
    let listings = state
        .submission_store
        .list_for_instructor(&user.id, filter.patient_actor_id.as_deref())
        .await?;
    Ok(Json(listings))
}

/// POST /api/submissions/{id}/feedback
pub async fn update_feedback_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(submission_id): Path<String>,
    Json(payload): Json<FeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    if !user.role.can_review() {
        return Err(ApiError::forbidden(
            "Only instructors can review submissions",
        ));
    }
    let submission = state
        .submission_store
        .update_feedback(
            &submission_id,
            &user.id,
            &payload.feedback,
            payload.grade.as_deref(),
        )
        .await?;
    Ok(Json(submission))
}

/// GET /api/instructors
pub async fn list_instructors_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    let instructors = state.auth_store.list_instructors().await?;
    Ok(Json(instructors))
}
