//! Notification ingestion and delivery stats.
//!
//! `POST /api/notify` is where the host's notification event is wired to the
//! notifier: every published message lands in `WebhookNotifier::submit`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use hookcast_common::error::AppError;
use hookcast_common::types::MessageRecord;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notify", post(notify))
        .route("/api/notifier/stats", get(stats))
}

/// POST /api/notify — Queue a notification for webhook delivery.
async fn notify(
    State(state): State<AppState>,
    Json(record): Json<MessageRecord>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.notifier.submit(record)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "queued": true, "id": id.to_string() })),
    ))
}

/// GET /api/notifier/stats — Delivery counters and worker state.
async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "active": state.notifier.is_active(),
        "worker_state": state.notifier.worker_state().map(|s| s.to_string()),
        "send_interval_secs": state.config.webhook.send_interval.as_secs(),
        "stats": state.notifier.stats(),
    }))
}
