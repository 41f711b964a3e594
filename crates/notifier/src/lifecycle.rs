//! Notifier lifecycle: activation, submission and shutdown.
//!
//! `WebhookNotifier` owns everything the worker shares with producers. Each
//! activation gets a fresh queue and shutdown token. The rate limiter is lent
//! to the running worker and returned on shutdown, so the minimum interval
//! holds across deactivate/activate cycles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use hookcast_common::config::WebhookConfig;
use hookcast_common::types::MessageRecord;

use crate::error::NotifierError;
use crate::queue::{DeliveryQueue, delivery_queue};
use crate::rate_limit::RateLimiter;
use crate::sender::WebhookSender;
use crate::stats::{DispatchStats, StatsSnapshot};
use crate::worker::{DispatchWorker, WorkerState};

struct ActiveWorker {
    queue: DeliveryQueue,
    shutdown: CancellationToken,
    handle: JoinHandle<RateLimiter>,
    state: watch::Receiver<WorkerState>,
}

pub struct WebhookNotifier {
    sender: Arc<dyn WebhookSender>,
    stats: Arc<DispatchStats>,
    /// Producer-facing slot; `submit` only ever takes this lock briefly.
    active: Mutex<Option<ActiveWorker>>,
    /// Serializes activate/deactivate. Holds the limiter while no worker runs.
    lifecycle: tokio::sync::Mutex<Option<RateLimiter>>,
}

impl WebhookNotifier {
    pub fn new(sender: Arc<dyn WebhookSender>) -> Self {
        Self {
            sender,
            stats: Arc::new(DispatchStats::new()),
            active: Mutex::new(None),
            lifecycle: tokio::sync::Mutex::new(None),
        }
    }

    /// Start a dispatch worker for `config`.
    ///
    /// Any running worker is stopped first. Returns `false` (and starts
    /// nothing) when delivery is disabled or no webhook URL is configured.
    pub async fn activate(&self, config: WebhookConfig) -> bool {
        let mut parked = self.lifecycle.lock().await;
        self.stop_worker(&mut parked).await;

        if !config.is_deliverable() {
            tracing::info!(
                enabled = config.enabled,
                has_url = !config.webhook_url.trim().is_empty(),
                "Webhook notifier not started: disabled or webhook URL missing"
            );
            return false;
        }

        let mut limiter = parked
            .take()
            .unwrap_or_else(|| RateLimiter::new(config.send_interval));
        limiter.set_min_interval(config.send_interval);

        let (queue, receiver) = delivery_queue();
        let shutdown = CancellationToken::new();
        let (worker, state) = DispatchWorker::new(
            receiver,
            limiter,
            self.sender.clone(),
            config,
            self.stats.clone(),
            shutdown.clone(),
        );
        let handle = tokio::spawn(worker.run());

        *self.slot() = Some(ActiveWorker {
            queue,
            shutdown,
            handle,
            state,
        });

        tracing::info!("Webhook notifier activated");
        true
    }

    /// Signal the worker to stop and wait for it to exit.
    ///
    /// A webhook call already in flight is allowed to finish; a pending
    /// rate-limit wait is abandoned. Messages still queued are discarded.
    /// Returns `false` if no worker was running.
    pub async fn deactivate(&self) -> bool {
        let mut parked = self.lifecycle.lock().await;
        self.stop_worker(&mut parked).await
    }

    async fn stop_worker(&self, parked: &mut Option<RateLimiter>) -> bool {
        let active = self.slot().take();
        let Some(active) = active else {
            return false;
        };

        let discarded = active.queue.len();
        active.shutdown.cancel();
        drop(active.queue);

        match active.handle.await {
            Ok(limiter) => *parked = Some(limiter),
            Err(e) => {
                tracing::error!(error = %e, "Webhook dispatch worker terminated abnormally");
            }
        }

        tracing::info!(discarded, "Webhook notifier deactivated");
        true
    }

    /// Validate a record and hand it to the worker.
    ///
    /// Never blocks. Records with neither title nor text are refused, as is
    /// everything submitted while no worker is running.
    pub fn submit(&self, record: MessageRecord) -> Result<Uuid, NotifierError> {
        if !record.has_content() {
            tracing::warn!("Webhook notification rejected: title and text cannot both be empty");
            self.stats.record_rejected();
            return Err(NotifierError::EmptyMessage);
        }

        let slot = self.slot();
        let Some(active) = slot.as_ref() else {
            tracing::debug!("Webhook notification dropped: notifier is not active");
            self.stats.record_rejected();
            return Err(NotifierError::Inactive);
        };

        match active.queue.enqueue(record) {
            Ok(id) => {
                self.stats.record_enqueued();
                tracing::info!(
                    message_id = %id,
                    queue_depth = active.queue.len(),
                    "Webhook notification queued"
                );
                Ok(id)
            }
            Err(e) => {
                self.stats.record_rejected();
                tracing::warn!(error = %e, "Webhook notification could not be queued");
                Err(e)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    /// Current state of the running worker, if any.
    pub fn worker_state(&self) -> Option<WorkerState> {
        self.slot().as_ref().map(|active| *active.state.borrow())
    }

    pub fn stats(&self) -> StatsSnapshot {
        let depth = self
            .slot()
            .as_ref()
            .map(|active| active.queue.len())
            .unwrap_or(0);
        self.stats.snapshot(depth)
    }

    fn slot(&self) -> MutexGuard<'_, Option<ActiveWorker>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for WebhookNotifier {
    fn drop(&mut self) {
        if let Some(active) = self.slot().as_ref() {
            active.shutdown.cancel();
        }
    }
}
