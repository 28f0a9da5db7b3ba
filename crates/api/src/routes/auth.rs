//! Route definitions for the `/auth` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{auth, sessions};
use crate::state::AppState;

/// Routes mounted at `/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/verify", get(auth::verify))
        .route("/logout", post(auth::logout))
        .route("/logout-all", post(auth::logout_all))
        .route("/change-password", put(auth::change_password))
        .route("/profile", get(auth::profile).put(auth::update_profile))
        .route("/sessions", get(sessions::list))
        .route("/sessions/{id}", delete(sessions::revoke))
}
