//! Bearer-token access gate for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::Utc;
use skinledger_core::error::CoreError;
use skinledger_core::hashing::token_fingerprint;
use skinledger_db::models::session::UserSession;
use skinledger_db::models::user::User;
use skinledger_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::verify_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated caller: the owning user and the live session behind the
/// presented token.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthSession) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, session_id = %auth.session.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub session: UserSession,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Run the gate checks against a presented token, in order:
/// presence, signature and expiry, live session, owner state.
pub async fn authenticate(state: &AppState, token: Option<&str>) -> AppResult<AuthSession> {
    let token = token.ok_or(CoreError::NoToken)?;

    let subject = verify_token(token, &state.config.jwt).map_err(CoreError::from)?;

    let found =
        SessionRepo::find_valid_by_fingerprint(&state.pool, &token_fingerprint(token), Utc::now())
            .await?
            .filter(|found| found.session.id == subject.session_id)
            .ok_or(CoreError::InvalidSession)?;

    if !found.owner_active {
        return Err(CoreError::UserDisabled.into());
    }

    let user = UserRepo::find_by_id(&state.pool, subject.user_id)
        .await?
        .ok_or(CoreError::UserNotFound)?;

    Ok(AuthSession {
        user,
        session: found.session,
    })
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = authenticate(state, bearer_token(&parts.headers)).await;
        if let Err(AppError::Core(err)) = &auth {
            tracing::debug!(code = err.code(), "Access denied");
        }
        auth
    }
}
