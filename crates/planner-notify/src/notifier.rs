//! Fire-and-forget delivery.

use tracing::warn;

use crate::mail::{Mailer, OutgoingMail};

/// Wraps a [`Mailer`] so that delivery failures are logged and swallowed.
#[derive(Clone, Debug)]
pub struct Notifier<M: Mailer> {
    mailer: M,
}

impl<M: Mailer> Notifier<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    /// Send once, without retry. Returns whether the mail went out.
    pub async fn notify(&self, mail: &OutgoingMail) -> bool {
        match self.mailer.send(mail).await {
            Ok(()) => true,
            Err(e) => {
                warn!(to = %mail.to, error = %e, "Notification not delivered");
                false
            }
        }
    }
}
