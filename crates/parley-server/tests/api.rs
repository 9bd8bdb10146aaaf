use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use parley_engine::{Scorer, ScoreWeights, SessionConfig, SessionStore};
use parley_provider::{GeminiProvider, StubProvider};
use parley_server::create_router;
use parley_server::state::{AppState, VendorKeys};
use parley_server::sweep::run_sweep;

fn test_state(ttl_seconds: i64) -> AppState {
    let store = Arc::new(SessionStore::new(SessionConfig {
        ttl_seconds,
        ..Default::default()
    }));
    AppState::new(
        store,
        Scorer::new(ScoreWeights::default()),
        Arc::new(StubProvider),
        None,
        VendorKeys {
            generative_text: Some("AIzaSyExample123".into()),
            avatar: None,
        },
    )
}

fn app() -> (AppState, Router) {
    let state = test_state(30 * 60);
    let router = create_router(state.clone());
    (state, router)
}

async fn request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let req = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn start_session(router: &Router) -> String {
    let (status, body) = request(router, "POST", "/api/session/start", None).await;
    assert_eq!(status, StatusCode::OK);
    body["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn start_returns_fresh_state_and_opener() {
    let (_, router) = app();
    let (status, body) = request(&router, "POST", "/api/session/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
    assert!(body["initial"].as_str().unwrap().contains("Ukraine"));
    assert_eq!(body["state"]["score"], 0);
    assert_eq!(body["state"]["aidReleased"], 0);
}

#[tokio::test]
async fn interact_scores_the_commitment_scenario() {
    let (_, router) = app();
    let id = start_session(&router).await;

    let (status, body) = request(
        &router,
        "POST",
        &format!("/api/session/{id}/interact"),
        Some(serde_json::json!({
            "text": "I will investigate Biden and give you a great interview"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 40 (commitment) + 5 (one compliment) + 25 (media)
    assert_eq!(body["scoreChange"], 70);
    assert_eq!(body["state"]["score"], 70);
    assert_eq!(body["state"]["aidReleased"], 50);
    assert!(!body["aiResponse"].as_str().unwrap().is_empty());

    let concessions: Vec<&str> = body["state"]["concessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(concessions.contains(&"primary concession"));
    assert!(concessions.contains(&"media concession"));
}

#[tokio::test]
async fn interact_clamps_below_zero() {
    let (_, router) = app();
    let id = start_session(&router).await;

    let (status, body) = request(
        &router,
        "POST",
        &format!("/api/session/{id}/interact"),
        Some(serde_json::json!({ "text": "I refuse, that would be illegal" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["score"], 0);
    assert_eq!(body["state"]["aidReleased"], 0);
}

#[tokio::test]
async fn interact_requires_string_text() {
    let (_, router) = app();
    let id = start_session(&router).await;
    let uri = format!("/api/session/{id}/interact");

    let (status, body) = request(&router, "POST", &uri, Some(serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, _) = request(
        &router,
        "POST",
        &uri,
        Some(serde_json::json!({ "text": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &router,
        "POST",
        &uri,
        Some(serde_json::json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn interact_with_unknown_session_is_404() {
    let (_, router) = app();
    let (status, body) = request(
        &router,
        "POST",
        &format!("/api/session/{}/interact", uuid::Uuid::new_v4()),
        Some(serde_json::json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");

    let (status, _) = request(
        &router,
        "POST",
        "/api/session/not-a-uuid/interact",
        Some(serde_json::json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn conversation_returns_log_and_state() {
    let (_, router) = app();
    let id = start_session(&router).await;

    request(
        &router,
        "POST",
        &format!("/api/session/{id}/interact"),
        Some(serde_json::json!({ "text": "thank you, tremendous support" })),
    )
    .await;

    let (status, body) = request(
        &router,
        "GET",
        &format!("/api/session/{id}/conversation"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Opener, user turn, counterpart reply.
    let conversation = body["conversation"].as_array().unwrap();
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation[0]["speaker"], "counterpart");
    assert_eq!(conversation[1]["speaker"], "user");
    assert_eq!(conversation[2]["speaker"], "counterpart");
    assert!(body["state"]["score"].as_i64().is_some());
}

#[tokio::test]
async fn end_is_idempotent_and_interaction_after_end_is_404() {
    let (_, router) = app();
    let id = start_session(&router).await;
    let end_uri = format!("/api/session/{id}/end");

    let (status, body) = request(&router, "POST", &end_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // Ending again, or ending something that never existed, still succeeds.
    let (status, body) = request(&router, "POST", &end_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (status, body) = request(
        &router,
        "POST",
        &format!("/api/session/{}/end", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = request(
        &router,
        "POST",
        &format!("/api/session/{id}/interact"),
        Some(serde_json::json!({ "text": "hello again" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sweep_expires_idle_sessions() {
    let state = test_state(0);
    let router = create_router(state.clone());
    let id = start_session(&router).await;

    run_sweep(&state).await;

    let (status, _) = request(
        &router,
        "GET",
        &format!("/api/session/{id}/conversation"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn gemini_backed_state(base_url: String) -> AppState {
    let store = Arc::new(SessionStore::new(SessionConfig::default()));
    AppState::new(
        store,
        Scorer::new(ScoreWeights::default()),
        Arc::new(GeminiProvider::new("test-key").with_base_url(base_url)),
        None,
        VendorKeys::default(),
    )
}

#[tokio::test]
async fn interact_serves_provider_reply_when_upstream_is_healthy() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path(
            "/models/gemini-1.5-pro:generateContent",
        ))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "A perfect call. Perfect."}]}
                }]
            })),
        )
        .mount(&server)
        .await;

    let router = create_router(gemini_backed_state(server.uri()));
    let id = start_session(&router).await;
    let (status, body) = request(
        &router,
        "POST",
        &format!("/api/session/{id}/interact"),
        Some(serde_json::json!({ "text": "thank you" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aiResponse"], "A perfect call. Perfect.");
}

#[tokio::test]
async fn interact_degrades_to_fallback_when_upstream_fails() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let router = create_router(gemini_backed_state(server.uri()));
    let id = start_session(&router).await;
    let (status, body) = request(
        &router,
        "POST",
        &format!("/api/session/{id}/interact"),
        Some(serde_json::json!({ "text": "thank you" })),
    )
    .await;

    // The upstream failure never surfaces: still a 200, with a canned line
    // and the state update applied.
    assert_eq!(status, StatusCode::OK);
    assert!(!body["aiResponse"].as_str().unwrap().is_empty());
    assert_eq!(body["state"]["score"], 5);
}

#[tokio::test]
async fn config_status_masks_credentials() {
    let (_, router) = app();
    let (status, body) = request(&router, "GET", "/api/config/status", None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["generativeText"]["configured"], true);
    let preview = body["generativeText"]["keyPreview"].as_str().unwrap();
    assert_eq!(preview, "AIza…");
    assert_ne!(preview, "AIzaSyExample123");

    assert_eq!(body["avatar"]["configured"], false);
    assert!(body["avatar"].get("keyPreview").is_none());
}

#[tokio::test]
async fn avatar_token_without_presenter_is_404() {
    let (_, router) = app();
    let (status, _) = request(&router, "GET", "/api/avatar/token", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint() {
    let (_, router) = app();
    let (status, body) = request(&router, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
