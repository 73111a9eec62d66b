use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use prayaas_api::{build_app, AppConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "dev-prayaas-key";

fn app() -> Router {
    build_app(&AppConfig::default())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn open_session(app: &Router, profile: Value) -> String {
    let response = app
        .clone()
        .oneshot(post("/v1/chat/sessions", json!({ "profile": profile })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let parsed = read_json(response).await;
    parsed["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let parsed = read_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["active_sessions"], 0);
}

#[tokio::test]
async fn recommendations_require_api_key() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/recommendations")
        .header("content-type", "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "unauthorized");
}

#[tokio::test]
async fn recommendations_follow_the_profile_archetype() {
    let app = app();

    let senior = app
        .clone()
        .oneshot(post(
            "/v1/recommendations",
            json!({ "profile": { "age": 65, "family_members": 2 } }),
        ))
        .await
        .unwrap();
    assert_eq!(senior.status(), StatusCode::OK);
    let parsed = read_json(senior).await;
    assert_eq!(parsed["distribution"]["archetype"], "senior");
    let entries = parsed["distribution"]["entries"].as_array().unwrap();
    assert_eq!(entries[0]["label"], "Health Insurance");
    assert_eq!(entries[0]["weight_percent"], 45);
    assert_eq!(parsed["featured"].as_array().unwrap().len(), 3);

    let standard = app
        .oneshot(post(
            "/v1/recommendations",
            json!({ "profile": { "age": 28, "family_members": 3 } }),
        ))
        .await
        .unwrap();
    let parsed = read_json(standard).await;
    assert_eq!(parsed["distribution"]["archetype"], "standard");
    assert_eq!(parsed["distribution"]["entries"][0]["category"], "term_life");
}

#[tokio::test]
async fn invalid_profile_is_rejected() {
    let response = app()
        .oneshot(post(
            "/v1/recommendations",
            json!({ "profile": { "age": 12 } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = read_json(response).await;
    assert_eq!(parsed["error"], "invalid_profile");
    assert!(parsed["message"].as_str().unwrap().contains("age 12"));
}

#[tokio::test]
async fn policy_analysis_returns_score_card_and_verdict() {
    let response = app()
        .oneshot(post(
            "/v1/policy/analyze",
            json!({ "policy_name": "LIC Jeevan Anand", "profile": { "age": 40 } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["card"]["policy_name"], "LIC Jeevan Anand");
    assert_eq!(parsed["card"]["scores"]["overall_suitability"], 78);
    assert_eq!(parsed["card"]["scores"]["claim_settlement"], 87);
    assert_eq!(parsed["verdict"], "recommended");
    assert_eq!(parsed["radar"].as_array().unwrap().len(), 6);

    let timeline = parsed["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 6);
    assert_eq!(timeline[0]["age"], 40);
    assert_eq!(timeline[5]["age"], 65);
}

#[tokio::test]
async fn blank_policy_name_is_an_invalid_query() {
    let response = app()
        .oneshot(post("/v1/policy/analyze", json!({ "policy_name": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_query");
}

#[tokio::test]
async fn chat_session_flow_keeps_an_ordered_transcript() {
    let app = app();
    let session_id = open_session(&app, json!({ "age": 35, "family_members": 3 })).await;

    let response = app
        .clone()
        .oneshot(post(
            "/v1/chat",
            json!({ "session_id": session_id, "text": "Should I buy term life cover?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["topic"], "life_insurance");
    assert_eq!(parsed["turn_count"], 3);
    let reply = parsed["reply_text"].as_str().unwrap();
    assert!(reply.contains("age 35"));
    assert!(reply.contains("family of 3 members"));

    let detail = app
        .clone()
        .oneshot(get(&format!("/v1/chat/sessions/{session_id}")))
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    let parsed = read_json(detail).await;
    assert_eq!(parsed["state"], "idle");
    let roles: Vec<&str> = parsed["turns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|turn| turn["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["assistant", "user", "assistant"]);
}

#[tokio::test]
async fn claims_outrank_investment_vocabulary() {
    let app = app();
    let session_id = open_session(&app, json!({})).await;

    let response = app
        .oneshot(post(
            "/v1/chat",
            json!({ "session_id": session_id, "text": "Tell me about claim settlement ULIP" }),
        ))
        .await
        .unwrap();

    let parsed = read_json(response).await;
    assert_eq!(parsed["topic"], "claim_settlement");
    assert!(parsed["reply_text"].as_str().unwrap().contains("Max Life: 99.34%"));
}

#[tokio::test]
async fn chat_rejects_unknown_session_and_blank_text() {
    let app = app();

    let missing = app
        .clone()
        .oneshot(post(
            "/v1/chat",
            json!({ "session_id": "no-such-session", "text": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let session_id = open_session(&app, json!({})).await;
    let blank = app
        .oneshot(post(
            "/v1/chat",
            json!({ "session_id": session_id, "text": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(blank).await["error"], "empty_message");
}

#[tokio::test]
async fn profile_options_are_public() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/v1/profile/options")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = read_json(response).await;
    assert_eq!(parsed["languages"].as_array().unwrap().len(), 8);
    assert_eq!(parsed["defaults"]["age"], 30);
}

#[tokio::test]
async fn rate_limit_applies_per_client() {
    let config = AppConfig {
        rate_limit_max: 2,
        rate_limit_window: Duration::from_secs(60),
        ..AppConfig::default()
    };
    let app = build_app(&config);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post("/v1/recommendations", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let limited = app
        .clone()
        .oneshot(post("/v1/recommendations", json!({})))
        .await
        .unwrap();
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_turns_show_up_in_health_metrics() {
    let app = app();
    let session_id = open_session(&app, json!({})).await;

    let response = app
        .clone()
        .oneshot(post(
            "/v1/chat",
            json!({ "session_id": session_id, "text": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let metrics = &read_json(health).await["metrics"];
    assert_eq!(metrics["requests_total"], 1);
    assert_eq!(metrics["chat_turns_total"], 1);
    assert_eq!(metrics["fallback_total"], 1);
    assert!(metrics["avg_latency_micros"].as_f64().unwrap() >= 0.0);
}
