//! Integration tests for API routes.
//!
//! Uses `tower::ServiceExt` to test Axum routes without a real HTTP server,
//! with a recording sender standing in for the webhook endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use hookcast_api::routes::create_router;
use hookcast_api::state::AppState;
use hookcast_common::config::{AppConfig, WebhookConfig};
use hookcast_notifier::{DeliveryError, WebhookNotifier, WebhookResponse, WebhookSender};

// ============================================================
// Helpers
// ============================================================

#[derive(Default)]
struct RecordingSender {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl WebhookSender for RecordingSender {
    async fn get(&self, url: &str) -> Result<WebhookResponse, DeliveryError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(WebhookResponse::new(200, "OK"))
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).unwrap();
    config.webhook = WebhookConfig::new("https://hooks.example.com/send?t={title}&m={text}")
        .with_allowed_types(["Download", "Manual"]);
    config
}

/// Build an AppState whose notifier is active (or not).
async fn build_test_state(active: bool) -> (AppState, Arc<RecordingSender>) {
    let config = test_config();
    let sender = Arc::new(RecordingSender::default());
    let notifier = Arc::new(WebhookNotifier::new(sender.clone()));
    if active {
        assert!(notifier.activate(config.webhook.clone()).await);
    }
    (AppState::new(notifier, config), sender)
}

async fn post_notify(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/notify")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================
// Health
// ============================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (state, _sender) = build_test_state(false).await;
    let (status, json) = get_json(create_router(state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "hookcast");
    assert_eq!(json["notifier_active"], false);
}

// ============================================================
// Notify
// ============================================================

#[tokio::test(start_paused = true)]
async fn test_notify_queues_and_delivers() {
    let (state, sender) = build_test_state(true).await;
    let notifier = state.notifier.clone();

    let (status, json) = post_notify(
        create_router(state),
        serde_json::json!({ "title": "Hi There", "text": "a&b", "type": "Download" }),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["queued"], true);
    assert!(json["id"].is_string());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        sender.urls.lock().unwrap().clone(),
        vec!["https://hooks.example.com/send?t=Hi+There&m=a%26b"]
    );

    notifier.deactivate().await;
}

#[tokio::test]
async fn test_notify_rejects_empty_message() {
    let (state, sender) = build_test_state(true).await;
    let notifier = state.notifier.clone();

    let (status, json) = post_notify(
        create_router(state),
        serde_json::json!({ "title": "", "type": "Manual" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "title and text cannot both be empty");
    assert!(sender.urls.lock().unwrap().is_empty());

    notifier.deactivate().await;
}

#[tokio::test]
async fn test_notify_when_inactive_is_unavailable() {
    let (state, _sender) = build_test_state(false).await;

    let (status, json) = post_notify(
        create_router(state),
        serde_json::json!({ "title": "hello" }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "webhook notifier is not active");
}

#[tokio::test]
async fn test_notify_rejects_unknown_type() {
    let (state, _sender) = build_test_state(true).await;
    let notifier = state.notifier.clone();

    let (status, _json) = post_notify(
        create_router(state),
        serde_json::json!({ "title": "hello", "type": "NotAType" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    notifier.deactivate().await;
}

// ============================================================
// Stats
// ============================================================

#[tokio::test(start_paused = true)]
async fn test_stats_reflect_filtering() {
    let (state, sender) = build_test_state(true).await;

    let (status, _) = post_notify(
        create_router(state.clone()),
        serde_json::json!({ "title": "filtered", "type": "SiteMessage" }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = post_notify(
        create_router(state.clone()),
        serde_json::json!({ "title": "routed", "channel": "telegram" }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, json) = get_json(create_router(state.clone()), "/api/notifier/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active"], true);
    assert_eq!(json["worker_state"], "idle");
    assert_eq!(json["send_interval_secs"], 5);
    assert_eq!(json["stats"]["enqueued"], 2);
    assert_eq!(json["stats"]["skipped"], 2);
    assert_eq!(json["stats"]["delivered"], 0);
    assert!(sender.urls.lock().unwrap().is_empty());

    state.notifier.deactivate().await;
}
