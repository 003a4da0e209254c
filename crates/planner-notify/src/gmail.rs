//! Gmail API delivery.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::NotifyError;
use crate::mail::{Mailer, OutgoingMail};

pub const GMAIL_SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Sends through the Gmail `users/me/messages/send` endpoint using an
/// OAuth access token with the `gmail.send` scope.
#[derive(Clone)]
pub struct GmailMailer {
    client: Client,
    access_token: String,
    endpoint: String,
}

impl GmailMailer {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            access_token: access_token.into(),
            endpoint: GMAIL_SEND_URL.into(),
        }
    }

    /// Point at a different endpoint (a local stub, for instance).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl std::fmt::Debug for GmailMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailMailer")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Mailer for GmailMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        let raw = mail.to_raw()?;
        debug!(to = %mail.to, endpoint = %self.endpoint, "Sending mail via Gmail");

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = res.json().await?;
        info!(
            to = %mail.to,
            message_id = sent.id.as_deref().unwrap_or("-"),
            "Mail sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let mailer = GmailMailer::new("secret-token");
        let rendered = format!("{mailer:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains(GMAIL_SEND_URL));
    }

    #[tokio::test]
    async fn invalid_message_fails_before_any_request() {
        // Unroutable endpoint: reaching the network would be a transport error.
        let mailer = GmailMailer::new("t").with_endpoint("http://127.0.0.1:1/send");
        let err = mailer
            .send(&OutgoingMail::new("", "s", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let mailer = GmailMailer::new("t").with_endpoint("http://127.0.0.1:1/send");
        let err = mailer
            .send(&OutgoingMail::new("a@example.com", "s", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
