//! Planner Notify: fire-and-forget transactional email.
//!
//! Delivery goes through a [`Mailer`]; [`Notifier`] wraps one so that a
//! failed send is logged and never propagated to the caller.

pub mod error;
pub mod gmail;
pub mod logging;
pub mod mail;
pub mod notifier;

pub use error::NotifyError;
pub use gmail::GmailMailer;
pub use logging::LogMailer;
pub use mail::{Mailer, OutgoingMail};
pub use notifier::Notifier;
