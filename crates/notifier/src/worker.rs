//! Dispatch worker — the single consumer of the delivery queue.
//!
//! For each dequeued message:
//! 1. Drop channel-routed messages (they are delivered elsewhere)
//! 2. Drop messages whose type is not in the configured allow-list
//! 3. Wait out the rate limiter
//! 4. Render the URL and perform the webhook GET
//! 5. Classify and log the outcome; only a 200 resets the rate limiter
//!
//! Failures are terminal for the message but never for the worker. The loop
//! ends only when the shutdown token is cancelled.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use hookcast_common::config::WebhookConfig;
use hookcast_common::types::NotificationType;

use crate::error::DeliveryError;
use crate::queue::{QueueReceiver, QueuedMessage};
use crate::rate_limit::RateLimiter;
use crate::render::render_url;
use crate::sender::{WebhookResponse, WebhookSender};
use crate::stats::DispatchStats;

/// Observable worker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting on the queue
    Idle,
    /// Sleeping until the minimum interval has passed
    RateLimited,
    /// Waiting for the webhook call to complete
    Sending,
    /// Terminal
    Exited,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Idle => write!(f, "idle"),
            WorkerState::RateLimited => write!(f, "rate_limited"),
            WorkerState::Sending => write!(f, "sending"),
            WorkerState::Exited => write!(f, "exited"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ChannelRouted,
    TypeFiltered(NotificationType),
}

/// What happened to one dequeued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Skipped(SkipReason),
    Failed(DeliveryError),
    /// Shutdown arrived while waiting on the rate limiter; the message was dropped.
    Cancelled,
}

pub struct DispatchWorker {
    queue: QueueReceiver,
    limiter: RateLimiter,
    sender: Arc<dyn WebhookSender>,
    config: WebhookConfig,
    stats: Arc<DispatchStats>,
    shutdown: CancellationToken,
    state: watch::Sender<WorkerState>,
}

impl DispatchWorker {
    /// Build a worker bound to `queue` and `limiter`. The returned receiver
    /// tracks its state.
    pub fn new(
        queue: QueueReceiver,
        limiter: RateLimiter,
        sender: Arc<dyn WebhookSender>,
        config: WebhookConfig,
        stats: Arc<DispatchStats>,
        shutdown: CancellationToken,
    ) -> (Self, watch::Receiver<WorkerState>) {
        let (state, state_rx) = watch::channel(WorkerState::Idle);
        let worker = Self {
            queue,
            limiter,
            sender,
            config,
            stats,
            shutdown,
            state,
        };
        (worker, state_rx)
    }

    /// Drain the queue until shutdown, then hand the rate limiter back so the
    /// next worker keeps the cadence.
    pub async fn run(mut self) -> RateLimiter {
        tracing::info!(
            send_interval_ms = self.limiter.min_interval().as_millis() as u64,
            allowed_types = self.config.allowed_types.len(),
            "Webhook dispatch worker started"
        );

        loop {
            self.set_state(WorkerState::Idle);

            let Some(message) = self.queue.dequeue(&self.shutdown).await else {
                break;
            };

            if self.process(message).await == DeliveryOutcome::Cancelled {
                break;
            }
        }

        self.set_state(WorkerState::Exited);
        tracing::info!("Webhook dispatch worker exiting");
        self.limiter
    }

    /// Run one message through filtering, rate limiting and delivery.
    pub async fn process(&mut self, message: QueuedMessage) -> DeliveryOutcome {
        let record = &message.record;

        if record.is_channel_routed() {
            tracing::debug!(
                message_id = %message.id,
                channel = record.channel.as_deref().unwrap_or_default(),
                "Skipping channel-routed message"
            );
            self.stats.record_skipped();
            return DeliveryOutcome::Skipped(SkipReason::ChannelRouted);
        }

        if let Some(message_type) = record.message_type
            && !self.config.allows(message_type.name())
        {
            tracing::info!(
                message_id = %message.id,
                message_type = %message_type,
                "Message type not enabled for webhook delivery"
            );
            self.stats.record_skipped();
            return DeliveryOutcome::Skipped(SkipReason::TypeFiltered(message_type));
        }

        let wait = self.limiter.remaining();
        if !wait.is_zero() {
            self.set_state(WorkerState::RateLimited);
            tracing::debug!(
                message_id = %message.id,
                wait_ms = wait.as_millis() as u64,
                "Rate limiting webhook delivery"
            );
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    tracing::info!(
                        message_id = %message.id,
                        "Shutdown during rate-limit wait, message dropped"
                    );
                    return DeliveryOutcome::Cancelled;
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }

        self.set_state(WorkerState::Sending);
        let url = render_url(
            &self.config.webhook_url,
            record.title_or_empty(),
            record.text_or_empty(),
        );
        tracing::debug!(message_id = %message.id, url = %url, "Sending webhook notification");

        match self.send(url.clone()).await {
            Ok(response) if response.is_success() => {
                self.limiter.record_success();
                self.stats.record_delivered();
                let queued_ms = (chrono::Utc::now() - message.enqueued_at).num_milliseconds();
                tracing::info!(message_id = %message.id, queued_ms, "Webhook notification sent");
                DeliveryOutcome::Delivered
            }
            Ok(response) => {
                self.stats.record_failed();
                tracing::warn!(
                    message_id = %message.id,
                    url = %url,
                    status = response.status,
                    reason = %response.reason,
                    "Webhook notification failed"
                );
                DeliveryOutcome::Failed(DeliveryError::Http {
                    status: response.status,
                    reason: response.reason,
                })
            }
            Err(err) => {
                self.stats.record_failed();
                match &err {
                    DeliveryError::NoResponse(detail) => tracing::warn!(
                        message_id = %message.id,
                        url = %url,
                        error = %detail,
                        "Webhook notification failed, no response received"
                    ),
                    _ => tracing::error!(
                        message_id = %message.id,
                        url = %url,
                        error = %err,
                        "Webhook notification error"
                    ),
                }
                DeliveryOutcome::Failed(err)
            }
        }
    }

    /// Run the sender on its own task so a panicking sender costs one
    /// message, not the worker.
    async fn send(&self, url: String) -> Result<WebhookResponse, DeliveryError> {
        let sender = self.sender.clone();
        match tokio::spawn(async move { sender.get(&url).await }).await {
            Ok(result) => result,
            Err(join_err) => Err(DeliveryError::Request(join_err.to_string())),
        }
    }

    fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }
}
