//! Outbound mail: the transport seam and the notification gateway built on it.

pub(crate) mod gateway;
pub(crate) mod smtp;
mod templates;

use async_trait::async_trait;

pub(crate) use gateway::NotificationGateway;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("message rejected: {0}")]
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct OutgoingMail {
    pub(crate) to: String,
    pub(crate) subject: String,
    pub(crate) html: String,
}

/// Delivers a rendered message. One attempt per call; callers own retry policy.
#[async_trait]
pub(crate) trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Used when no SMTP relay is configured: the message is written to the log instead.
#[derive(Clone, Debug, Default)]
pub(crate) struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail transport disabled, message not sent");
        tracing::debug!(html = %mail.html, "undelivered message body");
        Ok(())
    }
}
