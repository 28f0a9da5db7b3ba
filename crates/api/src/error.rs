use std::sync::OnceLock;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};
use skinledger_core::error::{CoreError, ErrorKind};

/// Whether 500 responses carry the underlying error text in a `detail` field.
///
/// Set once at startup; unset means hidden.
static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Enable or disable internal error detail in responses. Only the first call
/// takes effect.
pub fn expose_internal_details(enabled: bool) {
    let _ = EXPOSE_DETAILS.set(enabled);
}

fn details_exposed() -> bool {
    EXPOSE_DETAILS.get().copied().unwrap_or(false)
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `skinledger_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::InvalidBody(rejection.body_text()))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::InternalError(format!("Token signing failed: {err}"))
    }
}

/// Fully resolved error response before serialization.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    extra: Map<String, Value>,
    detail: Option<String>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            extra: Map::new(),
            detail: None,
        }
    }

    fn internal(detail: String) -> Self {
        Self {
            detail: Some(detail),
            ..Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred",
            )
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Locked => StatusCode::LOCKED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn classify_core_error(core: &CoreError) -> ErrorBody {
    if let CoreError::Internal(msg) = core {
        tracing::error!(error = %msg, "Internal core error");
        return ErrorBody::internal(msg.clone());
    }

    let mut body = ErrorBody::new(status_for(core.kind()), core.code(), core.to_string());
    match core {
        CoreError::InvalidCredentials {
            attempts_remaining: Some(remaining),
        } => {
            body.extra
                .insert("attemptsRemaining".into(), json!(remaining));
        }
        CoreError::AccountLocked { until } => {
            body.message = "Account temporarily locked due to too many failed login attempts"
                .to_string();
            body.extra.insert("lockedUntil".into(), json!(until));
        }
        _ => {}
    }
    body
}

/// Classify a sqlx error into a response.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorBody {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ErrorBody::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "Duplicate value violates a unique constraint",
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorBody::internal(other.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let resolved = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorBody::internal(msg.clone())
            }
        };

        let mut body = Map::new();
        body.insert("error".into(), Value::String(resolved.message));
        body.insert("code".into(), Value::String(resolved.code.to_string()));
        body.extend(resolved.extra);
        if let Some(detail) = resolved.detail.filter(|_| details_exposed()) {
            body.insert("detail".into(), Value::String(detail));
        }

        (resolved.status, axum::Json(Value::Object(body))).into_response()
    }
}
