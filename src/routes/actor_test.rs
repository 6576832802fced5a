use super::*;
use axum::http::{Request, StatusCode};

async fn extract(headers: &[(&str, &str)]) -> Result<ReviewerActor, ApiError> {
    let mut builder = Request::builder().uri("/");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let (mut parts, ()) = builder.body(()).unwrap().into_parts();
    ReviewerActor::from_request_parts(&mut parts, &()).await
}

#[tokio::test]
async fn missing_headers_are_unauthorized() {
    let err = extract(&[]).await.unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_false_without_role_is_unauthorized() {
    let err = extract(&[(ADMIN_HEADER, "false")]).await.unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_header_yields_reviewer() {
    let ReviewerActor(actor) = extract(&[(ROLE_HEADER, "section_head")]).await.unwrap();
    assert_eq!(actor, Actor::reviewer(ReviewerRole::SectionHead));
}

#[tokio::test]
async fn admin_header_yields_admin() {
    let ReviewerActor(actor) = extract(&[(ADMIN_HEADER, "TRUE")]).await.unwrap();
    assert_eq!(actor, Actor::admin());
}

#[tokio::test]
async fn unknown_role_is_bad_request() {
    let err = extract(&[(ROLE_HEADER, "janitor")]).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}
