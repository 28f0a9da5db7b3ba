//! Outside production, 500 responses carry the underlying error text.
//!
//! Kept in its own test binary because the setting is process-wide.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use skinledger_api::error::{expose_internal_details, AppError};

#[tokio::test]
async fn detail_is_included_when_exposed() {
    expose_internal_details(true);

    let response = AppError::InternalError("pool exhausted".into()).into_response();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert_eq!(json["detail"], "pool exhausted");
}
