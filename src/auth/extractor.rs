// src/auth/extractor.rs
// Axum extractor resolving `Authorization: Bearer <token>` to an Identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use super::types::Identity;
use crate::api::error::ApiError;
use crate::state::AppState;

/// Required caller identity. Rejects with 401 when the header is missing
/// or the token is unknown.
pub struct AuthUser(pub Identity);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Err(ApiError::unauthorized("Unauthorized"));
        };

        let identity = state
            .auth_store
            .resolve_token(token)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

        Ok(AuthUser(identity))
    }
}
