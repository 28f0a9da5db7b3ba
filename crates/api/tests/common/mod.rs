#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use skinledger_api::auth::jwt::JwtConfig;
use skinledger_api::auth::password::hash_password;
use skinledger_api::config::{AppEnv, LogFormat, ServerConfig};
use skinledger_api::router::build_app_router;
use skinledger_api::state::AppState;
use skinledger_db::models::user::{CreateUser, User};
use skinledger_db::repositories::UserRepo;
use skinledger_db::DbPool;

pub const TEST_PASSWORD: &str = "pass1234";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session_sweep_interval_secs: 3600,
        environment: AppEnv::Development,
        trust_proxy: false,
        log_format: LogFormat::Text,
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            token_expiry_hours: 24,
            session_expiry_days: 7,
        },
    }
}

/// A fresh in-memory database with migrations applied.
pub async fn test_pool() -> DbPool {
    let pool = skinledger_db::create_memory_pool()
        .await
        .expect("in-memory pool should open");
    skinledger_db::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    pool
}

/// Build the full application router over `pool`, behind the same middleware
/// stack as production.
pub fn build_test_app(pool: DbPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// As [`build_test_app`], with a caller-adjusted configuration.
pub fn build_test_app_with_config(pool: DbPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user directly, bypassing the API. The password is [`TEST_PASSWORD`].
pub async fn create_test_user(pool: &DbPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        full_name: username.to_string(),
    };
    UserRepo::create(pool, &input, chrono::Utc::now())
        .await
        .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Log in through the API and return the token.
pub async fn login_token(app: Router, identifier: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "username": identifier, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}
