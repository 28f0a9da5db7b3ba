//! Authentication service: login with lockout, registration, logout,
//! password change, profile update and session management.

use chrono::Utc;
use skinledger_core::credentials::{
    non_blank, validate_email, validate_password_strength, validate_username,
};
use skinledger_core::error::CoreError;
use skinledger_core::hashing::token_fingerprint;
use skinledger_core::lockout::{
    account_state, attempts_remaining, lock_deadline, AccountState, MAX_FAILED_ATTEMPTS,
};
use skinledger_core::types::{DbId, SessionId, Timestamp};
use skinledger_db::models::session::{CreateSession, SessionInfo};
use skinledger_db::models::user::{CreateUser, PublicUser, UpdateProfile};
use skinledger_db::repositories::{SessionRepo, UserRepo};
use uuid::Uuid;

use crate::auth::jwt::issue_token_at;
use crate::auth::password::{hash_password_async, verify_password_async};
use crate::dto::{ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::error::AppResult;
use crate::middleware::client::ClientMeta;
use crate::state::AppState;

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutput {
    pub user: PublicUser,
    pub token: String,
    pub session_id: SessionId,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Passwords are never trimmed, only checked for presence.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Authenticate by username or email and open a new session.
///
/// Unknown, inactive and wrong-password attempts all look the same to the
/// caller, except that a wrong password against a known account reports the
/// attempts left before lockout. A locked account is rejected before its
/// password is checked, so attempts during the lock are not counted.
pub async fn login(
    state: &AppState,
    req: LoginRequest,
    client: ClientMeta,
) -> AppResult<LoginOutput> {
    let (Some(identifier), Some(password)) = (
        non_blank(req.username.as_deref()),
        present(req.password.as_deref()),
    ) else {
        return Err(CoreError::MissingCredentials.into());
    };

    let Some(user) = UserRepo::find_active_by_username_or_email(&state.pool, identifier).await?
    else {
        tracing::debug!("Login for unknown or inactive account");
        return Err(CoreError::InvalidCredentials {
            attempts_remaining: None,
        }
        .into());
    };

    if let AccountState::Locked { until } = account_state(user.locked_until, Utc::now()) {
        tracing::warn!(user_id = user.id, %until, "Login attempt on locked account");
        return Err(CoreError::AccountLocked { until }.into());
    }

    let matches = verify_password_async(password.to_string(), user.password_hash.clone()).await?;

    if !matches {
        let failed_at = Utc::now();
        let Some(failure) = UserRepo::record_failed_login(
            &state.pool,
            user.id,
            MAX_FAILED_ATTEMPTS,
            lock_deadline(failed_at),
            failed_at,
        )
        .await?
        else {
            // Another request locked the account while this password was
            // being checked.
            return Err(unrecorded_failure(state, user.id, failed_at).await?.into());
        };

        let locked = failure.locked_until.is_some();
        if locked {
            tracing::warn!(
                user_id = user.id,
                attempts = failure.login_attempts,
                "Account locked after repeated failed logins"
            );
        } else {
            tracing::info!(
                user_id = user.id,
                attempts = failure.login_attempts,
                "Failed login"
            );
        }

        return Err(CoreError::InvalidCredentials {
            attempts_remaining: Some(attempts_remaining(failure.login_attempts, locked)),
        }
        .into());
    }

    let now = Utc::now();
    let user = UserRepo::record_successful_login(&state.pool, user.id, now)
        .await?
        .ok_or(CoreError::InvalidCredentials {
            attempts_remaining: None,
        })?;

    // The id is minted first so the token's `sid` claim names this row.
    let session_id = Uuid::new_v4();
    let jwt = &state.config.jwt;
    let token = issue_token_at(user.id, session_id, now, jwt)?;

    let session = CreateSession {
        id: session_id,
        user_id: user.id,
        token_fingerprint: token_fingerprint(&token),
        expires_at: now + jwt.session_lifetime(),
        ip_address: client.ip,
        user_agent: client.user_agent,
    };
    SessionRepo::create(&state.pool, &session, now).await?;

    tracing::info!(user_id = user.id, %session_id, "Login succeeded");

    Ok(LoginOutput {
        user: PublicUser::from(user),
        token,
        session_id,
        expires_in: jwt.token_lifetime_secs(),
    })
}

/// Why a failure could not be recorded: the lock if one holds at `now`,
/// otherwise the generic credential failure.
async fn unrecorded_failure(
    state: &AppState,
    user_id: DbId,
    now: Timestamp,
) -> AppResult<CoreError> {
    let locked_until = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .and_then(|user| user.locked_until);

    Ok(match account_state(locked_until, now) {
        AccountState::Locked { until } => {
            tracing::warn!(user_id, %until, "Login attempt on locked account");
            CoreError::AccountLocked { until }
        }
        AccountState::Unlocked => CoreError::InvalidCredentials {
            attempts_remaining: None,
        },
    })
}

/// Create a new account. Does not log the user in.
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<PublicUser> {
    let (Some(username), Some(email), Some(password)) = (
        non_blank(req.username.as_deref()),
        non_blank(req.email.as_deref()),
        present(req.password.as_deref()),
    ) else {
        return Err(CoreError::MissingFields.into());
    };

    validate_username(username)?;
    validate_email(email)?;
    validate_password_strength(password)?;

    if UserRepo::exists_by_username_or_email(&state.pool, username, email).await? {
        return Err(CoreError::UserExists.into());
    }

    let password_hash = hash_password_async(password.to_string()).await?;
    let full_name = non_blank(req.full_name.as_deref()).unwrap_or(username);

    let input = CreateUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        full_name: full_name.to_string(),
    };

    // A concurrent registration can still win between the check and the
    // insert; the unique indexes turn that into the same conflict.
    let user = match UserRepo::create(&state.pool, &input, Utc::now()).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(CoreError::UserExists.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(PublicUser::from(user))
}

/// End one session. Ending an already-ended session is not an error.
pub async fn logout(state: &AppState, session_id: SessionId) -> AppResult<()> {
    let deleted = SessionRepo::delete_by_id(&state.pool, session_id).await?;
    tracing::info!(%session_id, deleted, "Logout");
    Ok(())
}

/// End every session of a user. Returns how many were ended.
pub async fn logout_all(state: &AppState, user_id: DbId) -> AppResult<u64> {
    let deleted = SessionRepo::delete_all_for_user(&state.pool, user_id).await?;
    tracing::info!(user_id, deleted, "Logout from all sessions");
    Ok(deleted)
}

/// Replace the password after checking the current one, then end every
/// session of the user, including the caller's.
pub async fn change_password(
    state: &AppState,
    user_id: DbId,
    req: ChangePasswordRequest,
) -> AppResult<()> {
    let (Some(current), Some(new)) = (
        present(req.current_password.as_deref()),
        present(req.new_password.as_deref()),
    ) else {
        return Err(CoreError::MissingPasswords.into());
    };

    validate_password_strength(new)?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::UserNotFound)?;

    if !verify_password_async(current.to_string(), user.password_hash).await? {
        tracing::info!(user_id, "Password change rejected: wrong current password");
        return Err(CoreError::InvalidCurrentPassword.into());
    }

    let new_hash = hash_password_async(new.to_string()).await?;
    if !UserRepo::update_password(&state.pool, user_id, &new_hash, Utc::now()).await? {
        return Err(CoreError::UserNotFound.into());
    }

    let revoked = SessionRepo::delete_all_for_user(&state.pool, user_id).await?;
    tracing::info!(user_id, revoked, "Password changed, all sessions revoked");
    Ok(())
}

/// Update display name and/or email.
pub async fn update_profile(
    state: &AppState,
    user_id: DbId,
    req: UpdateProfileRequest,
) -> AppResult<PublicUser> {
    let full_name = non_blank(req.full_name.as_deref());
    let email = non_blank(req.email.as_deref());

    if full_name.is_none() && email.is_none() {
        return Err(CoreError::NoUpdates.into());
    }

    if let Some(email) = email {
        validate_email(email)?;
        if UserRepo::email_taken_by_other(&state.pool, email, user_id).await? {
            return Err(CoreError::EmailInUse.into());
        }
    }

    let input = UpdateProfile {
        full_name: full_name.map(str::to_string),
        email: email.map(str::to_string),
    };

    let user = match UserRepo::update_profile(&state.pool, user_id, &input, Utc::now()).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(CoreError::UserNotFound.into()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(CoreError::EmailInUse.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id, "Profile updated");
    Ok(PublicUser::from(user))
}

/// A user's unexpired sessions, newest first, flagging the caller's own.
pub async fn list_sessions(
    state: &AppState,
    user_id: DbId,
    current: SessionId,
) -> AppResult<Vec<SessionInfo>> {
    let sessions = SessionRepo::list_active_for_user(&state.pool, user_id, Utc::now()).await?;
    Ok(sessions
        .iter()
        .map(|s| SessionInfo::from_session(s, current))
        .collect())
}

/// End one of the caller's own sessions.
///
/// Sessions belonging to other users are reported as not found.
pub async fn revoke_session(
    state: &AppState,
    user_id: DbId,
    session_id: SessionId,
) -> AppResult<()> {
    SessionRepo::find_for_user(&state.pool, session_id, user_id)
        .await?
        .ok_or(CoreError::SessionNotFound)?;

    SessionRepo::delete_by_id(&state.pool, session_id).await?;
    tracing::info!(user_id, %session_id, "Session revoked");
    Ok(())
}
