//! Handlers for `/auth/sessions`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use skinledger_core::error::CoreError;
use skinledger_db::models::session::SessionInfo;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::auth::MessageResponse;
use crate::middleware::auth::AuthSession;
use crate::services;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionInfo>,
}

/// GET /api/auth/sessions
pub async fn list(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<SessionListResponse>> {
    let sessions = services::auth::list_sessions(&state, auth.user.id, auth.session.id).await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// DELETE /api/auth/sessions/{id}
///
/// An id that is not a UUID cannot name a session, so it is not found.
pub async fn revoke(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let session_id = Uuid::parse_str(&id).map_err(|_| CoreError::SessionNotFound)?;
    services::auth::revoke_session(&state, auth.user.id, session_id).await?;
    Ok(Json(MessageResponse {
        message: "Session revoked successfully",
    }))
}
