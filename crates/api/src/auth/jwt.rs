//! Bearer token codec.
//!
//! Access tokens are HS256-signed JWTs carrying a [`Claims`] payload that
//! binds the token to one user and one server-side session. A token is only
//! honoured while its signature and expiry check out *and* its session row
//! still exists; this module covers the first half.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use skinledger_core::error::CoreError;
use skinledger_core::types::{DbId, SessionId, Timestamp};

/// Discriminator stored in the `typ` claim of every access token.
pub const ACCESS_TOKEN_KIND: &str = "access";

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The session row this token was issued with.
    pub sid: SessionId,
    /// Token kind, always [`ACCESS_TOKEN_KIND`].
    pub typ: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: DbId,
    pub session_id: SessionId,
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for CoreError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed | TokenError::SignatureInvalid => CoreError::InvalidToken,
            TokenError::Expired => CoreError::TokenExpired,
        }
    }
}

/// Configuration for token and session lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in hours (default: 24).
    pub token_expiry_hours: i64,
    /// Session row lifetime in days (default: 7). Sessions outlive tokens.
    pub session_expiry_days: i64,
}

/// Default access token expiry in hours.
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;
/// Default session expiry in days.
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `JWT_SECRET`          | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS`    | no       | `24`    |
    /// | `SESSION_EXPIRY_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if an expiry is not
    /// a positive integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");
        assert!(token_expiry_hours > 0, "JWT_EXPIRY_HOURS must be positive");

        let session_expiry_days: i64 = std::env::var("SESSION_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_DAYS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_DAYS must be a valid i64");
        assert!(session_expiry_days > 0, "SESSION_EXPIRY_DAYS must be positive");

        Self {
            secret,
            token_expiry_hours,
            session_expiry_days,
        }
    }

    /// Token lifetime in seconds, as reported in `expiresIn`.
    pub fn token_lifetime_secs(&self) -> i64 {
        self.token_expiry_hours * 3600
    }

    /// Session row lifetime.
    pub fn session_lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(self.session_expiry_days)
    }
}

/// Issue a token for `user_id` bound to `session_id`, valid from now.
pub fn issue_token(
    user_id: DbId,
    session_id: SessionId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token_at(user_id, session_id, Utc::now(), config)
}

/// Issue a token as if minted at `issued_at`.
pub fn issue_token_at(
    user_id: DbId,
    session_id: SessionId,
    issued_at: Timestamp,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = issued_at.timestamp();
    let claims = Claims {
        sub: user_id,
        sid: session_id,
        typ: ACCESS_TOKEN_KIND.to_string(),
        iat,
        exp: iat + config.token_lifetime_secs(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and kind of a token.
///
/// Expiry is checked with zero leeway.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<TokenSubject, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        _ => TokenError::Malformed,
    })?;

    if data.claims.typ != ACCESS_TOKEN_KIND {
        return Err(TokenError::Malformed);
    }

    Ok(TokenSubject {
        user_id: data.claims.sub,
        session_id: data.claims.sid,
    })
}
