//! Unbounded FIFO handoff between producers and the dispatch worker.
//!
//! Producers hold a cloneable [`DeliveryQueue`]; the single worker owns the
//! [`QueueReceiver`]. Enqueue never blocks. Dequeue parks the worker until a
//! message arrives or the shutdown token fires, whichever comes first.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use hookcast_common::types::MessageRecord;

use crate::error::NotifierError;

/// A record waiting in the queue, tagged for log correlation.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
    pub id: Uuid,
    pub record: MessageRecord,
    pub enqueued_at: DateTime<Utc>,
}

/// Producer side of the delivery queue.
#[derive(Debug, Clone)]
pub struct DeliveryQueue {
    tx: mpsc::UnboundedSender<QueuedMessage>,
    depth: Arc<AtomicUsize>,
}

/// Consumer side of the delivery queue. Owned by exactly one worker.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::UnboundedReceiver<QueuedMessage>,
    depth: Arc<AtomicUsize>,
}

/// Create a fresh, empty delivery queue.
pub fn delivery_queue() -> (DeliveryQueue, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        DeliveryQueue {
            tx,
            depth: depth.clone(),
        },
        QueueReceiver { rx, depth },
    )
}

impl DeliveryQueue {
    /// Append a record to the tail of the queue.
    ///
    /// Fails only when the consuming worker has already gone away.
    pub fn enqueue(&self, record: MessageRecord) -> Result<Uuid, NotifierError> {
        let message = QueuedMessage {
            id: Uuid::new_v4(),
            record,
            enqueued_at: Utc::now(),
        };
        let id = message.id;

        self.depth.fetch_add(1, Ordering::Relaxed);
        if self.tx.send(message).is_err() {
            self.depth.fetch_sub(1, Ordering::Relaxed);
            return Err(NotifierError::Inactive);
        }

        Ok(id)
    }

    /// Approximate number of messages waiting for the worker.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QueueReceiver {
    /// Wait for the next message.
    ///
    /// Returns `None` once `shutdown` is cancelled (checked before every pop,
    /// so a pending cancellation wins over queued messages) or when every
    /// producer handle has been dropped.
    pub async fn dequeue(&mut self, shutdown: &CancellationToken) -> Option<QueuedMessage> {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            message = self.rx.recv() => {
                if message.is_some() {
                    self.depth.fetch_sub(1, Ordering::Relaxed);
                }
                message
            }
        }
    }
}
