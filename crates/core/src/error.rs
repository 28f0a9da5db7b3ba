//! Domain error taxonomy for the authentication core.
//!
//! Every failure carries a stable machine-readable [`CoreError::code`] and
//! belongs to exactly one [`ErrorKind`], which the HTTP layer maps to a
//! status code.

use crate::types::Timestamp;

/// Coarse error category, one per HTTP status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input (400).
    Validation,
    /// Duplicate identity (409).
    Conflict,
    /// Bad credentials, token or session (401).
    Authentication,
    /// Account temporarily locked (423).
    Locked,
    /// Referenced record does not exist (404).
    NotFound,
    /// Unexpected failure (500).
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    // -- Validation -------------------------------------------------------
    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username, email and password are required")]
    MissingFields,

    #[error("Username must be between 3 and 50 characters")]
    InvalidUsername,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters and contain at least 1 digit")]
    WeakPassword,

    #[error("Current and new password are required")]
    MissingPasswords,

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("No fields to update")]
    NoUpdates,

    #[error("{0}")]
    InvalidBody(String),

    // -- Authentication ---------------------------------------------------
    /// Unknown identifier, inactive account or wrong password.
    ///
    /// `attempts_remaining` is only reported for a wrong password against a
    /// known account; it is `Some(0)` when the failure just locked it.
    #[error("Invalid credentials")]
    InvalidCredentials { attempts_remaining: Option<i64> },

    #[error("Access token required")]
    NoToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Session expired or invalid")]
    InvalidSession,

    #[error("User is disabled")]
    UserDisabled,

    #[error("User not found")]
    UserNotFound,

    // -- Conflict ---------------------------------------------------------
    #[error("Username or email is already in use")]
    UserExists,

    #[error("Email is already in use")]
    EmailInUse,

    // -- Locked -----------------------------------------------------------
    #[error("Account temporarily locked until {until}")]
    AccountLocked { until: Timestamp },

    // -- Not found --------------------------------------------------------
    #[error("Session not found")]
    SessionNotFound,

    // -- Internal ---------------------------------------------------------
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::MissingCredentials
            | CoreError::MissingFields
            | CoreError::InvalidUsername
            | CoreError::InvalidEmail
            | CoreError::WeakPassword
            | CoreError::MissingPasswords
            | CoreError::InvalidCurrentPassword
            | CoreError::NoUpdates
            | CoreError::InvalidBody(_) => ErrorKind::Validation,

            CoreError::InvalidCredentials { .. }
            | CoreError::NoToken
            | CoreError::InvalidToken
            | CoreError::TokenExpired
            | CoreError::InvalidSession
            | CoreError::UserDisabled
            | CoreError::UserNotFound => ErrorKind::Authentication,

            CoreError::UserExists | CoreError::EmailInUse => ErrorKind::Conflict,

            CoreError::AccountLocked { .. } => ErrorKind::Locked,

            CoreError::SessionNotFound => ErrorKind::NotFound,

            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code returned to clients in the `code` field.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::MissingCredentials => "MISSING_CREDENTIALS",
            CoreError::MissingFields => "MISSING_FIELDS",
            CoreError::InvalidUsername => "INVALID_USERNAME",
            CoreError::InvalidEmail => "INVALID_EMAIL",
            CoreError::WeakPassword => "WEAK_PASSWORD",
            CoreError::MissingPasswords => "MISSING_PASSWORDS",
            CoreError::InvalidCurrentPassword => "INVALID_CURRENT_PASSWORD",
            CoreError::NoUpdates => "NO_UPDATES",
            CoreError::InvalidBody(_) => "INVALID_BODY",
            CoreError::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            CoreError::NoToken => "NO_TOKEN",
            CoreError::InvalidToken => "INVALID_TOKEN",
            CoreError::TokenExpired => "TOKEN_EXPIRED",
            CoreError::InvalidSession => "INVALID_SESSION",
            CoreError::UserDisabled => "USER_DISABLED",
            CoreError::UserNotFound => "USER_NOT_FOUND",
            CoreError::UserExists => "USER_EXISTS",
            CoreError::EmailInUse => "EMAIL_IN_USE",
            CoreError::AccountLocked { .. } => "ACCOUNT_LOCKED",
            CoreError::SessionNotFound => "SESSION_NOT_FOUND",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
