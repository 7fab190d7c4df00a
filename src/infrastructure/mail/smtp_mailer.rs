//! SMTP mail transport over STARTTLS.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::service::{MailError, MailResult, Mailer, OutgoingMail};

/// SMTP connection settings.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// `From` mailbox, e.g. `Offers <offers@example.com>`.
    pub from: String,
}

/// Mailer delivering through an authenticated STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport. No connection is opened until the first send.
    pub fn new(settings: SmtpSettings) -> MailResult<Self> {
        let from = parse_mailbox(&settings.from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self { transport, from })
    }

    /// Checks connectivity and authentication with the relay.
    pub async fn test_connection(&self) -> MailResult<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

fn parse_mailbox(value: &str) -> MailResult<Mailbox> {
    value
        .parse::<Mailbox>()
        .map_err(|_| MailError::Address(value.to_string()))
}

/// Converts an [`OutgoingMail`] into a MIME message from `from`.
pub fn build_message(from: Mailbox, mail: OutgoingMail) -> MailResult<Message> {
    let builder = Message::builder()
        .from(from)
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject);

    let html = SinglePart::html(mail.html_body);

    let message = match mail.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| MailError::Build(e.to_string()))?;
            let part = Attachment::new(attachment.file_name).body(attachment.bytes, content_type);
            builder.multipart(MultiPart::mixed().singlepart(html).singlepart(part))
        }
        None => builder.singlepart(html),
    };

    message.map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> MailResult<()> {
        let recipient = mail.to.clone();
        let message = build_message(self.from.clone(), mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(to = %recipient, "Offer email delivered");
        Ok(())
    }
}
