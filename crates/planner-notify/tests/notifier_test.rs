//! Notifier behaviour with stub mailers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use planner_notify::{LogMailer, Mailer, NotifyError, Notifier, OutgoingMail};

#[derive(Clone, Default)]
struct FailingMailer {
    attempts: Arc<AtomicUsize>,
}

impl Mailer for FailingMailer {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Rejected {
            status: 503,
            body: "unavailable".into(),
        })
    }
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<std::sync::Mutex<Vec<OutgoingMail>>>,
}

impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

fn invite_mail() -> OutgoingMail {
    OutgoingMail::new(
        "guest@example.com",
        "You're invited",
        "You have been invited to Spring cleanup.",
    )
}

#[tokio::test]
async fn failure_is_swallowed_without_retry() {
    let mailer = FailingMailer::default();
    let notifier = Notifier::new(mailer.clone());

    assert!(!notifier.notify(&invite_mail()).await);
    assert_eq!(mailer.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn success_is_reported() {
    let mailer = RecordingMailer::default();
    let notifier = Notifier::new(mailer.clone());

    assert!(notifier.notify(&invite_mail()).await);
    assert_eq!(mailer.sent.lock().unwrap().as_slice(), &[invite_mail()]);
}

#[tokio::test]
async fn log_mailer_accepts_well_formed_mail() {
    let notifier = Notifier::new(LogMailer::new());
    assert!(notifier.notify(&invite_mail()).await);
}

#[tokio::test]
async fn log_mailer_rejects_header_injection() {
    let notifier = Notifier::new(LogMailer::new());
    let mail = OutgoingMail::new("a@example.com\nBcc: x@example.com", "s", "b");
    assert!(!notifier.notify(&mail).await);
}
