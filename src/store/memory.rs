use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::core::error::Error;
use crate::store::CredentialStore;
use crate::types::{NewUser, Role, User, UserId};

#[derive(Default)]
struct Inner {
    next_id: UserId,
    users: BTreeMap<UserId, User>,
    emails: HashMap<String, UserId>,
    consumed: HashMap<String, DateTime<Utc>>,
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub(crate) struct MemoryCredentialStore {
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentialStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let inner = self.inner.lock().await;

        Ok(inner
            .emails
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, Error> {
        let mut inner = self.inner.lock().await;

        if inner.emails.contains_key(&user.email) {
            return Err(Error::UserAlreadyExists);
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_verified: user.is_verified,
        };

        inner.emails.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), Error> {
        match self.inner.lock().await.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_owned();
                Ok(())
            }
            None => Err(Error::UserNotFound),
        }
    }

    async fn mark_verified(&self, id: UserId) -> Result<bool, Error> {
        match self.inner.lock().await.users.get_mut(&id) {
            Some(user) => {
                user.is_verified = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        Ok(self.inner.lock().await.users.values().cloned().collect())
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<Option<User>, Error> {
        Ok(self.inner.lock().await.users.get_mut(&id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> Result<bool, Error> {
        let mut inner = self.inner.lock().await;

        match inner.users.remove(&id) {
            Some(user) => {
                inner.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume_reset_token(
        &self,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();

        inner.consumed.retain(|_, expiry| *expiry > now);

        if inner.consumed.contains_key(jti) {
            return Ok(false);
        }

        inner.consumed.insert(jti.to_owned(), expires_at);

        Ok(true)
    }

    async fn release_reset_token(&self, jti: &str) -> Result<(), Error> {
        self.inner.lock().await.consumed.remove(jti);

        Ok(())
    }
}
