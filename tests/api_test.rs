mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use volley_coach::api::routes::create_routes;
use volley_coach::{PoseAnalysisService, ScoringConfig, ScoringProfile};

use common::{bump_sequence, init_test_logging, ready_position};

fn app() -> Router {
    init_test_logging();
    create_routes(PoseAnalysisService::new(ScoringConfig::default()).unwrap())
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    respond(app, request).await
}

async fn send_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    respond(app, request).await
}

/// Status and body; bodies that are not JSON come back as a string
async fn respond(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "volley-coach");
}

#[tokio::test]
async fn test_config_endpoint_reports_active_profile() {
    let strict = create_routes(
        PoseAnalysisService::new(ScoringConfig::for_profile(ScoringProfile::Strict)).unwrap(),
    );
    let (status, body) = send(strict, Method::GET, "/api/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"], "strict");
    assert_eq!(body["combination"]["best_frame"], 0.6);
}

#[tokio::test]
async fn test_frame_analysis() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/frame",
        Some(json!({ "landmarks": ready_position() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["frame_score"]["total"].as_u64().unwrap() >= 85);
    assert_eq!(body["grade"]["grade"], "S");
    assert!(body["body_scale"].as_f64().unwrap() > 0.7);
    assert!(body["standards"]["arm_angle"]["min"].is_number());
}

#[tokio::test]
async fn test_frame_analysis_without_body() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/frame",
        Some(json!({ "landmarks": null })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frame_score"]["total"], 0);
    assert_eq!(body["level"]["passed"], false);
}

#[tokio::test]
async fn test_sequence_analysis() {
    let mut frames = serde_json::to_value(bump_sequence(12)).unwrap();
    frames[3] = Value::Null;

    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/sequence",
        Some(json!({ "frames": frames, "mode": "representative" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["analysis_id"].is_string());
    assert!(body["analyzed_at"].is_string());
    assert_eq!(body["mode"], "representative");
    assert_eq!(body["total_frames"], 12);
    assert_eq!(body["valid_frames"], 11);
    assert_eq!(body["frame_scores"][3], 0);
    assert!(body["feedback"].as_array().unwrap().len() > 3);
}

#[tokio::test]
async fn test_empty_sequence_is_rejected() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/sequence",
        Some(json!({ "frames": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_malformed_frame_is_rejected() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/sequence",
        Some(json!({ "frames": [{ "left_wrist": { "x": "high" } }] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_payload");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_invalid_json_uses_error_envelope() {
    let (status, body) = send_raw(app(), "/api/analysis/frame", "{ \"landmarks\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_payload");

    let (status, body) = send_raw(app(), "/api/analysis/combine", "[1, 2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_payload");
}

#[tokio::test]
async fn test_large_sequence_within_frame_cap() {
    let frames = bump_sequence(5000);
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/sequence",
        Some(json!({ "frames": frames })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_frames"], 5000);
    assert_eq!(body["valid_frames"], 5000);
}

#[tokio::test]
async fn test_combine_scores() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/combine",
        Some(json!({ "frame_score": 80.0, "sequence_score": 70.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["combined_score"], 76);
    assert_eq!(body["grade"]["grade"], "A");
    assert_eq!(body["level"]["level"], "intermediate");
}

#[tokio::test]
async fn test_combine_scores_out_of_range() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/analysis/combine",
        Some(json!({ "frame_score": 120.0, "sequence_score": 70.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}
