//! Mail transport trait and message types.

use async_trait::async_trait;

/// Errors raised while building or delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mailbox `{0}`")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;

/// Binary attachment carried by an [`OutgoingMail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A single HTML message with an optional attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<MailAttachment>,
}

/// Outbound mail transport. The sender address is fixed by the implementation.
///
/// # Implementations
///
/// - [`crate::infrastructure::mail::SmtpMailer`] - Authenticated STARTTLS SMTP
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers `mail`. Nothing is retried.
    async fn send(&self, mail: OutgoingMail) -> MailResult<()>;
}
