//! Outbound mail over SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async transport. It is only constructed
//! when mail credentials are configured; see [`MailCredentials`].

use async_trait::async_trait;
use derive_more::Display;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::settings::MailCredentials;

/// A fully composed message, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMail {
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Email address parse error: {_0}")]
    Address(String),

    #[display("Email build error: {_0}")]
    Build(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),
}

impl std::error::Error for MailError {}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(credentials: &MailCredentials) -> Result<Self, MailError> {
        let from: Mailbox = credentials.user
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&credentials.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(credentials.port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.pass.to_string(),
            ))
            .build();

        Ok(SmtpMailer { from, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        let to: Mailbox = mail.to
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))?;
        let reply_to: Mailbox = mail.reply_to
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::Address(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .reply_to(reply_to)
            .subject(mail.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(mail.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(mail.html_body.clone()),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::info!(to = %mail.to, "Contact email relayed");
        Ok(())
    }
}
