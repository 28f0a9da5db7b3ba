//! Request bodies.
//!
//! Every field is optional at the JSON level so that absent and blank values
//! are reported with the domain's own validation codes rather than a generic
//! deserialization failure.

use serde::Deserialize;

/// Body of `POST /auth/login`. `username` accepts a username or an email.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to the username when absent.
    pub full_name: Option<String>,
}

/// Body of `PUT /auth/change-password`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Body of `PUT /auth/profile`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}
