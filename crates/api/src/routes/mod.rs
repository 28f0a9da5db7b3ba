pub mod auth;
pub mod health;

use axum::http::Method;
use axum::Router;

use crate::state::AppState;

/// Every method served below, for the CORS preflight.
pub const ROUTE_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  login (public)
/// /auth/register               register (public)
/// /auth/verify                 verify token (requires auth)
/// /auth/logout                 end current session (requires auth)
/// /auth/logout-all             end every session (requires auth)
/// /auth/change-password        change password (requires auth)
/// /auth/profile                get, update (requires auth)
/// /auth/sessions               list (requires auth)
/// /auth/sessions/{id}          revoke (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
