//! Outbound email delivery.
//!
//! Provides a [`Mailer`] trait with one implementation:
//! - [`SmtpMailer`] - Authenticated STARTTLS SMTP via `lettre`

mod service;
mod smtp_mailer;

pub use service::{MailAttachment, MailError, MailResult, Mailer, OutgoingMail};
pub use smtp_mailer::{SmtpMailer, SmtpSettings, build_message};

#[cfg(test)]
pub use service::MockMailer;
