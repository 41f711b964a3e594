//! Outbound delivery capability.
//!
//! The worker only needs "GET this URL and tell me the status". The trait
//! keeps the HTTP client swappable; [`ReqwestSender`] is the production
//! implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Status line of a webhook response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub reason: String,
}

impl WebhookResponse {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Only a plain 200 counts as delivered.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Performs a single webhook GET.
///
/// `Ok` means the endpoint answered, whatever the status. Transport problems
/// are reported as [`DeliveryError::NoResponse`] or [`DeliveryError::Request`].
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn get(&self, url: &str) -> Result<WebhookResponse, DeliveryError>;
}

/// `reqwest`-backed webhook sender.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hookcast/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookSender for ReqwestSender {
    async fn get(&self, url: &str) -> Result<WebhookResponse, DeliveryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        Ok(WebhookResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown"),
        ))
    }
}

fn classify_transport_error(err: reqwest::Error) -> DeliveryError {
    if err.is_connect() || err.is_timeout() {
        DeliveryError::NoResponse(err.to_string())
    } else {
        DeliveryError::Request(err.to_string())
    }
}
