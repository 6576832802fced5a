use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde::Deserialize;
use tower::ServiceExt;

use crate::routes::actor::ROLE_HEADER;
use crate::state::test_helpers;

#[derive(Debug, Deserialize)]
struct Reason {
    reason: String,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[allow(dead_code)]
    page: Option<usize>,
}

fn json_request(content_type: Option<&str>, body: &'static str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/");
    if let Some(value) = content_type {
        builder = builder.header("content-type", value);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_code() {
    let err = ApiJson::<Reason>::from_request(json_request(Some("application/json"), "{"), &())
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body.code, "E_INVALID_REQUEST");
    assert!(!err.body.retryable);
}

#[tokio::test]
async fn wrong_json_shape_keeps_axum_status() {
    let err = ApiJson::<Reason>::from_request(json_request(Some("application/json"), r#"{"reason": 7}"#), &())
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.body.code, "E_INVALID_REQUEST");
}

#[tokio::test]
async fn missing_content_type_is_unsupported_media() {
    let err = ApiJson::<Reason>::from_request(json_request(None, r#"{"reason":"x"}"#), &())
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(err.body.code, "E_INVALID_REQUEST");
}

#[tokio::test]
async fn well_formed_json_passes_through() {
    let ApiJson(body) = ApiJson::<Reason>::from_request(json_request(Some("application/json"), r#"{"reason":"x"}"#), &())
        .await
        .unwrap();
    assert_eq!(body.reason, "x");
}

#[tokio::test]
async fn bad_query_value_is_bad_request_with_code() {
    let (mut parts, ()) = Request::builder().uri("/?page=abc").body(()).unwrap().into_parts();
    let err = ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body.code, "E_INVALID_REQUEST");
}

#[tokio::test]
async fn unknown_role_segment_answers_with_json_error() {
    let state = test_helpers::test_app_state();
    let (schedule_id, machine_id) = test_helpers::first_machine(&state).await;
    let uri = format!("/api/schedules/{schedule_id}/machines/{machine_id}/approvals/director/approve");

    let resp = crate::routes::app(state)
        .oneshot(Request::builder().method("POST").uri(uri).header(ROLE_HEADER, "leader").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "E_INVALID_REQUEST");
    assert_eq!(body["retryable"], false);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn malformed_machine_id_answers_with_json_error() {
    let state = test_helpers::test_app_state();
    let (schedule_id, _) = test_helpers::first_machine(&state).await;
    let uri = format!("/api/schedules/{schedule_id}/machines/not-a-uuid");

    let resp = crate::routes::app(state)
        .oneshot(Request::builder().uri(uri).header(ROLE_HEADER, "leader").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "E_INVALID_REQUEST");
}
