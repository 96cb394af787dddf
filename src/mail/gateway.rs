use std::sync::Arc;

use crate::core::error::Error;
use crate::mail::{templates, Mailer, OutgoingMail};
use crate::utils::encode::link_with_token;

pub(crate) const VERIFY_PATH: &str = "/api/auth/verify";
pub(crate) const RESET_PATH: &str = "/reset-password";

/// Renders the account emails and hands them to the configured [`Mailer`].
#[derive(Clone)]
pub(crate) struct NotificationGateway {
    mailer: Arc<dyn Mailer>,
    base_url: String,
}

impl std::fmt::Debug for NotificationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NotificationGateway {
    pub(crate) fn new(mailer: Arc<dyn Mailer>, base_url: impl Into<String>) -> Self {
        Self {
            mailer,
            base_url: base_url.into(),
        }
    }

    pub(crate) async fn send_verification(&self, email: &str, token: &str) -> Result<(), Error> {
        let link = self.link(VERIFY_PATH, token)?;

        self.dispatch(email, templates::VERIFICATION_SUBJECT, templates::verification(&link))
            .await
    }

    pub(crate) async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), Error> {
        let link = self.link(RESET_PATH, token)?;

        self.dispatch(email, templates::PASSWORD_RESET_SUBJECT, templates::password_reset(&link))
            .await
    }

    fn link(&self, path: &str, token: &str) -> Result<String, Error> {
        link_with_token(&self.base_url, path, token)
            .map_err(|e| Error::Internal(format!("could not encode link: {e}")))
    }

    async fn dispatch(&self, to: &str, subject: &str, html: String) -> Result<(), Error> {
        self.mailer
            .send(OutgoingMail {
                to: to.to_owned(),
                subject: subject.to_owned(),
                html,
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingMailer, RecordingMailer};

    #[tokio::test]
    async fn verification_mail_links_to_the_verify_endpoint() {
        let mailer = RecordingMailer::default();
        let gateway = NotificationGateway::new(Arc::new(mailer.clone()), "https://home.example");

        gateway.send_verification("a@x.com", "tok.en").await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, templates::VERIFICATION_SUBJECT);
        assert!(sent[0]
            .html
            .contains("https://home.example/api/auth/verify?token=tok.en"));
        assert_eq!(mailer.last_token().as_deref(), Some("tok.en"));
    }

    #[tokio::test]
    async fn reset_mail_links_to_the_reset_page() {
        let mailer = RecordingMailer::default();
        let gateway = NotificationGateway::new(Arc::new(mailer.clone()), "https://home.example/");

        gateway.send_password_reset("a@x.com", "abc").await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent[0].subject, templates::PASSWORD_RESET_SUBJECT);
        assert!(sent[0]
            .html
            .contains("https://home.example/reset-password?token=abc"));
    }

    #[tokio::test]
    async fn transport_failures_surface_as_delivery_errors() {
        let gateway = NotificationGateway::new(Arc::new(FailingMailer), "https://home.example");

        let err = gateway.send_verification("a@x.com", "abc").await.unwrap_err();

        assert!(matches!(err, Error::Delivery(_)));
    }
}
