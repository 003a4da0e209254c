//! Notification error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}
