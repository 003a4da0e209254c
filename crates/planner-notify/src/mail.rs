//! Outgoing messages and the [`Mailer`] seam.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// A plain-text message to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Render as an RFC 5322 message with a UTF-8 plain-text body.
    ///
    /// Header values may not contain line breaks.
    pub fn to_rfc5322(&self) -> Result<String, NotifyError> {
        if self.to.trim().is_empty() {
            return Err(NotifyError::InvalidMessage("recipient is empty".into()));
        }
        for (name, value) in [("To", &self.to), ("Subject", &self.subject)] {
            if value.contains(['\r', '\n']) {
                return Err(NotifyError::InvalidMessage(format!(
                    "{name} header contains a line break"
                )));
            }
        }

        Ok(format!(
            "To: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{}",
            self.to, self.subject, self.body
        ))
    }

    /// The rendered message, base64url-encoded without padding.
    pub fn to_raw(&self) -> Result<String, NotifyError> {
        Ok(URL_SAFE_NO_PAD.encode(self.to_rfc5322()?.as_bytes()))
    }
}

/// Mail delivery backend.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        mail: &OutgoingMail,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headers_then_body() {
        let mail = OutgoingMail::new("a@example.com", "Hello", "Body text");
        let rendered = mail.to_rfc5322().unwrap();

        assert!(rendered.starts_with("To: a@example.com\r\nSubject: Hello\r\n"));
        assert!(rendered.ends_with("\r\n\r\nBody text"));
    }

    #[test]
    fn rejects_header_injection() {
        let mail = OutgoingMail::new("a@example.com\r\nBcc: b@example.com", "Hi", "");
        assert!(matches!(
            mail.to_rfc5322(),
            Err(NotifyError::InvalidMessage(_))
        ));

        let mail = OutgoingMail::new("a@example.com", "Hi\nthere", "");
        assert!(mail.to_raw().is_err());
    }

    #[test]
    fn rejects_empty_recipient() {
        let mail = OutgoingMail::new("  ", "Hi", "");
        assert!(mail.to_rfc5322().is_err());
    }

    #[test]
    fn raw_is_url_safe_base64_without_padding() {
        let mail = OutgoingMail::new("a@example.com", "Subject?", "Body>>>");
        let raw = mail.to_raw().unwrap();

        assert!(!raw.contains('='));
        assert!(!raw.contains('+'));
        assert!(!raw.contains('/'));
        let decoded = URL_SAFE_NO_PAD.decode(raw).unwrap();
        assert_eq!(decoded, mail.to_rfc5322().unwrap().into_bytes());
    }
}
