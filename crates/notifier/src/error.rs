use thiserror::Error;

use hookcast_common::error::AppError;

/// Reasons a submission is refused before it reaches the queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    #[error("title and text cannot both be empty")]
    EmptyMessage,

    #[error("webhook notifier is not active")]
    Inactive,
}

impl From<NotifierError> for AppError {
    fn from(err: NotifierError) -> Self {
        match err {
            NotifierError::EmptyMessage => AppError::Validation(err.to_string()),
            NotifierError::Inactive => AppError::Unavailable(err.to_string()),
        }
    }
}

/// Failure of a single webhook delivery attempt. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The endpoint answered with a status other than 200.
    #[error("webhook returned status {status} ({reason})")]
    Http { status: u16, reason: String },

    /// No response was received (connection refused, DNS failure, timeout).
    #[error("no response from webhook: {0}")]
    NoResponse(String),

    /// Anything else that went wrong building or sending the request.
    #[error("webhook request failed: {0}")]
    Request(String),
}
