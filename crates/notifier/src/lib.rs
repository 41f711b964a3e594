//! Rate-limited webhook notification delivery.
//!
//! Producers call [`WebhookNotifier::submit`]; a single background worker
//! drains the queue, keeps successful deliveries at least `send_interval`
//! apart, renders the configured URL template and performs the webhook GET.
//! Delivery failures are logged and dropped, never retried.

pub mod error;
pub mod lifecycle;
pub mod queue;
pub mod rate_limit;
pub mod render;
pub mod sender;
pub mod stats;
pub mod worker;

pub use error::{DeliveryError, NotifierError};
pub use lifecycle::WebhookNotifier;
pub use sender::{ReqwestSender, WebhookResponse, WebhookSender};
pub use stats::StatsSnapshot;
pub use worker::{DeliveryOutcome, SkipReason, WorkerState};
