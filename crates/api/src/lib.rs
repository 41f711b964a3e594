//! Hookcast host process.
//!
//! Endpoints:
//! - POST /api/notify — publish a notification for webhook delivery
//! - GET  /api/notifier/stats — delivery counters and worker state
//! - GET  /health — liveness

pub mod routes;
pub mod state;
