//! Integration tests for the HTTP API
//!
//! Tests: health, scheme listing, review success and boundary errors

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use grantcraft::config::{ReviewConfig, SchemeRegistry};
use grantcraft::core::{api::AppState, create_router};

const SCORER_DRAFT: &str = include_str!("fixtures/scorer_full_draft.md");

fn create_test_router() -> axum::Router {
    create_router(AppState::default())
}

async fn post_review(router: axum::Router, body: String) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/review")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], grantcraft::VERSION);
    assert_eq!(json["signals"], 22);
}

#[tokio::test]
async fn test_list_schemes() {
    let response = create_test_router()
        .oneshot(Request::builder().uri("/schemes").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    let schemes = json.as_array().unwrap();
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0]["id"], "horizon_europe_ria_ia");
    assert_eq!(schemes[0]["criteria"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_review_returns_report_and_meta() {
    let body = json!({ "draft_content": SCORER_DRAFT, "draft_id": "draft-42" }).to_string();
    let (status, json) = post_review(create_test_router(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["draft_id"], "draft-42");
    assert_eq!(json["meta"]["scheme_id"], "horizon_europe_ria_ia");
    assert_eq!(json["meta"]["generated_at"], json["report"]["generated_at"]);
    assert_eq!(
        json["meta"]["draft_word_count"],
        json["report"]["draft_word_count"]
    );
    assert_eq!(json["report"]["criteria"].as_array().unwrap().len(), 3);
    assert_eq!(json["report"]["overall_passed"], true);
    assert!(json["report"]["markdown_report"]
        .as_str()
        .unwrap()
        .starts_with("# Reviewer Report"));
}

#[tokio::test]
async fn test_review_accepts_camel_case_fields() {
    let body = json!({ "draftContent": SCORER_DRAFT, "schemeId": "horizon_europe_ria_ia" }).to_string();
    let (status, json) = post_review(create_test_router(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["draft_id"], Value::Null);
}

#[tokio::test]
async fn test_review_rejects_invalid_json() {
    let (status, json) = post_review(create_test_router(), "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("invalid request body"));
}

#[tokio::test]
async fn test_review_rejects_missing_draft_content() {
    let (status, _) = post_review(create_test_router(), json!({ "draft_id": "x" }).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_review(create_test_router(), json!({ "draft_content": 42 }).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_rejects_unknown_scheme() {
    let body = json!({ "draft_content": SCORER_DRAFT, "scheme_id": "eic_accelerator" }).to_string();
    let (status, json) = post_review(create_test_router(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("eic_accelerator"));
    assert!(error.contains("horizon_europe_ria_ia"));
}

#[tokio::test]
async fn test_review_rejects_short_draft() {
    let body = json!({ "draft_content": "   Too short to review.   " }).to_string();
    let (status, json) = post_review(create_test_router(), body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["word_count"], 4);
    assert!(json["error"].as_str().unwrap().contains("at least 50 characters"));
}

/// The length check runs before scheme resolution
#[tokio::test]
async fn test_short_draft_checked_before_scheme() {
    let body = json!({ "draft_content": "short", "scheme_id": "nope" }).to_string();
    let (status, _) = post_review(create_test_router(), body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_min_draft_chars_is_configurable() {
    let review = ReviewConfig {
        min_draft_chars: 10,
        ..ReviewConfig::default()
    };
    let router = create_router(AppState::new(SchemeRegistry::builtin(), &review));
    let body = json!({ "draft_content": "Twelve chars" }).to_string();
    let (status, json) = post_review(router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["report"]["overall_score"], 0.0);
}
