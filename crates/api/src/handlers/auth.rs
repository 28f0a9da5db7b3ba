//! Handlers for the `/auth` resource (login, register, verify, logout,
//! password and profile).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use skinledger_core::types::SessionId;
use skinledger_db::models::user::PublicUser;

use crate::dto::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::client::ClientMeta;
use crate::services;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: PublicUser,
    pub token: String,
    pub session_id: SessionId,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Response carrying a user, optionally with a message.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: PublicUser,
}

/// Response of `GET /auth/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: PublicUser,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(input) = body?;
    let out = services::auth::login(&state, input, client).await?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        user: out.user,
        token: out.token,
        session_id: out.session_id,
        expires_in: out.expires_in,
    }))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let Json(input) = body?;
    let user = services::auth::register(&state, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: Some("User created successfully"),
            user,
        }),
    ))
}

/// GET /api/auth/verify
///
/// All checks happen in the [`AuthSession`] extractor.
pub async fn verify(auth: AuthSession) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user: PublicUser::from(auth.user),
    })
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<MessageResponse>> {
    services::auth::logout(&state, auth.session.id).await?;
    Ok(MessageResponse::new("Logout successful"))
}

/// POST /api/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<MessageResponse>> {
    services::auth::logout_all(&state, auth.user.id).await?;
    Ok(MessageResponse::new("Logged out from all sessions"))
}

/// PUT /api/auth/change-password
///
/// Ends every session on success; the client must log in again.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthSession,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(input) = body?;
    services::auth::change_password(&state, auth.user.id, input).await?;
    Ok(MessageResponse::new(
        "Password changed successfully. Please log in again.",
    ))
}

/// GET /api/auth/profile
pub async fn profile(auth: AuthSession) -> Json<UserResponse> {
    Json(UserResponse {
        message: None,
        user: PublicUser::from(auth.user),
    })
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthSession,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Json(input) = body?;
    let user = services::auth::update_profile(&state, auth.user.id, input).await?;

    Ok(Json(UserResponse {
        message: Some("Profile updated successfully"),
        user,
    }))
}
