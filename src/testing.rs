//! Fakes shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::controllers::auth::AuthController;
use crate::controllers::user::UserController;
use crate::core::error::Error;
use crate::core::state::AppState;
use crate::mail::{MailError, Mailer, NotificationGateway, OutgoingMail};
use crate::store::{CredentialStore, MemoryCredentialStore};
use crate::token::TokenService;
use crate::types::{NewUser, Role, User, UserId};
use crate::utils::password::{PasswordHasher, MIN_BCRYPT_COST};

pub(crate) const SECRET: &str = "test-secret";
pub(crate) const BASE_URL: &str = "http://localhost:3000";

pub(crate) fn token_service() -> TokenService {
    TokenService::new(SECRET).unwrap()
}

pub(crate) fn auth_controller<S: CredentialStore + 'static>(
    store: Arc<S>,
    mailer: RecordingMailer,
) -> AuthController {
    auth_controller_with(store, Arc::new(mailer))
}

pub(crate) fn auth_controller_with<S: CredentialStore + 'static>(
    store: Arc<S>,
    mailer: Arc<dyn Mailer>,
) -> AuthController {
    AuthController::new(
        store,
        token_service(),
        NotificationGateway::new(mailer, BASE_URL),
        PasswordHasher::new(MIN_BCRYPT_COST).unwrap(),
    )
    .unwrap()
}

pub(crate) fn app_state(store: Arc<MemoryCredentialStore>, mailer: RecordingMailer) -> AppState {
    AppState {
        auth_controller: auth_controller(store.clone(), mailer),
        user_controller: UserController::new(store),
    }
}

/// Keeps every message and can pull the token back out of the last link.
#[derive(Clone, Default)]
pub(crate) struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl RecordingMailer {
    pub(crate) fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub(crate) fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let html = &sent.last()?.html;
        let start = html.find("?token=")? + "?token=".len();
        let token: String = html[start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            .collect();

        Some(token)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub(crate) struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), MailError> {
        Err(MailError::Rejected("relay unavailable".into()))
    }
}

/// Memory store that counts password writes and can be told to fail them.
#[derive(Default)]
pub(crate) struct CountingStore {
    inner: MemoryCredentialStore,
    password_updates: AtomicUsize,
    fail_password_updates: AtomicBool,
}

impl CountingStore {
    pub(crate) fn password_updates(&self) -> usize {
        self.password_updates.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_password_updates(&self, fail: bool) {
        self.fail_password_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.inner.find_by_id(id).await
    }

    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.inner.create(user).await
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), Error> {
        if self.fail_password_updates.load(Ordering::SeqCst) {
            return Err(Error::Internal("password write failed".into()));
        }

        self.password_updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_password(id, password_hash).await
    }

    async fn mark_verified(&self, id: UserId) -> Result<bool, Error> {
        self.inner.mark_verified(id).await
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        self.inner.list().await
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<Option<User>, Error> {
        self.inner.update_role(id, role).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, Error> {
        self.inner.delete(id).await
    }

    async fn consume_reset_token(
        &self,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        self.inner.consume_reset_token(jti, expires_at).await
    }

    async fn release_reset_token(&self, jti: &str) -> Result<(), Error> {
        self.inner.release_reset_token(jti).await
    }
}
