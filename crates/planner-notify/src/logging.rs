//! Logging mailer for development.

use tracing::info;

use crate::error::NotifyError;
use crate::mail::{Mailer, OutgoingMail};

/// Logs messages instead of delivering them.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub const fn new() -> Self {
        Self
    }
}

impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        // Rendering catches malformed headers the same way a real send would.
        mail.to_rfc5322()?;
        info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "Mail (not delivered)"
        );
        Ok(())
    }
}
