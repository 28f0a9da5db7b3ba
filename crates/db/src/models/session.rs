//! User session model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use skinledger_core::types::{DbId, SessionId, Timestamp};

/// A session row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: SessionId,
    pub user_id: DbId,
    /// SHA-256 digest of the bearer token issued with this session.
    pub token_fingerprint: String,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// An unexpired session joined with its owner's `is_active` flag.
#[derive(Debug, Clone, FromRow)]
pub struct ValidSession {
    #[sqlx(flatten)]
    pub session: UserSession,
    pub owner_active: bool,
}

/// DTO for creating a session.
pub struct CreateSession {
    pub id: SessionId,
    pub user_id: DbId,
    pub token_fingerprint: String,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Client-facing view of a session in the active-sessions listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_current: bool,
}

impl SessionInfo {
    pub fn from_session(session: &UserSession, current: SessionId) -> Self {
        Self {
            id: session.id,
            created_at: session.created_at,
            expires_at: session.expires_at,
            ip_address: session.ip_address.clone(),
            user_agent: session.user_agent.clone(),
            is_current: session.id == current,
        }
    }
}
