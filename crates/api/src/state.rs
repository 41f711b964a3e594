//! Shared application state for the Axum server.

use std::sync::Arc;

use hookcast_common::config::AppConfig;
use hookcast_notifier::WebhookNotifier;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub notifier: Arc<WebhookNotifier>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(notifier: Arc<WebhookNotifier>, config: AppConfig) -> Self {
        Self { notifier, config }
    }
}
